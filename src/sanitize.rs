//! Clean up of record sets.

use crate::types::Record;
use std::collections::HashMap;

/// Removes duplicate records, keeping the first of each and the original
/// order. The lowest TTL of the duplicates is kept.
///
/// Owner names are compared case-insensitively, the class, type and RDATA
/// must match exactly.
pub fn dedup(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashMap::new();
    let mut out: Vec<Record> = Vec::with_capacity(records.len());

    for record in records {
        // A record that can't be packed can't be compared either, keep it.
        let rdata = match record.resource.rdata() {
            Ok(rdata) => rdata,
            Err(_) => {
                out.push(record);
                continue;
            }
        };

        let key = (
            record.name.to_ascii_lowercase(),
            record.class,
            record.r#type(),
            rdata,
        );

        match seen.get(&key) {
            Some(&i) => {
                let kept: &mut Record = &mut out[i];
                kept.ttl = kept.ttl.min(record.ttl);
            }
            None => {
                seen.insert(key, out.len());
                out.push(record);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Resource;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn a(name: &str, ip: &str, ttl: u64) -> Record {
        Record {
            name: name.to_string(),
            class: 1,
            ttl: Duration::from_secs(ttl),
            resource: Resource::A(ip.parse().unwrap()),
        }
    }

    #[test]
    fn test_dedup() {
        let records = vec![
            a("example.com.", "192.0.2.1", 300),
            a("example.com.", "192.0.2.2", 300),
            a("EXAMPLE.com.", "192.0.2.1", 60),
            a("www.example.com.", "192.0.2.1", 300),
        ];

        assert_eq!(
            dedup(records),
            vec![
                a("example.com.", "192.0.2.1", 60),
                a("example.com.", "192.0.2.2", 300),
                a("www.example.com.", "192.0.2.1", 300),
            ]
        );
    }

    #[test]
    fn test_dedup_keeps_different_classes() {
        let mut chaos = a("example.com.", "192.0.2.1", 300);
        chaos.class = 3;

        let records = vec![a("example.com.", "192.0.2.1", 300), chaos.clone()];
        assert_eq!(dedup(records).len(), 2);
    }
}
