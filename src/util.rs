use data_encoding::{BASE32HEX_NOPAD, BASE64, HEXUPPER};

// Dumps out the slice in a pretty way
pub fn hexdump(slice: &[u8]) -> String {
    const WIDTH: usize = 16;
    let mut out = String::new();

    for (i, row) in slice.chunks(WIDTH).enumerate() {
        let row_hex: String = row.iter().map(|x| format!("{0:02X} ", x)).collect();

        // For each byte on this row, only print out the ascii printable ones.
        let row_str: String = row
            .iter()
            .map(|x| if x.is_ascii_graphic() || *x == b' ' { *x as char } else { '.' })
            .collect();

        out.push_str(&format!("{0:>08x}: {1:<48} {2:}\n", i * WIDTH, row_hex, row_str));
    }

    out
}

/// Upper case hex, as used for digests and salts.
pub fn to_hex(data: &[u8]) -> String {
    HEXUPPER.encode(data)
}

/// Base32 with the extended hex alphabet and no padding, as used by NSEC3.
pub fn to_base32hex(data: &[u8]) -> String {
    BASE32HEX_NOPAD.encode(data)
}

pub fn to_base64(data: &[u8]) -> String {
    BASE64.encode(data)
}
