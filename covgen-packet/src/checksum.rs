//! Internet checksum (RFC 1071) for the IPv4 header and the TCP segment
//!
//! Fixture traces are opened by detection tooling that may drop or flag
//! packets with bad checksums, so every frame is written with valid ones and
//! the trace reader can verify them again.

/// Calculates the Internet Checksum as defined in RFC 1071.
///
/// The data is summed as big-endian 16-bit words (an odd trailing byte is
/// padded with zero), carries are folded back in and the one's complement of
/// the result is returned.
///
/// # Examples
///
/// ```
/// use covgen_packet::checksum::internet_checksum;
///
/// let header = [0x45, 0x00, 0x00, 0x28];
/// let checksum = internet_checksum(&header);
/// assert_eq!(checksum, !0x4528);
/// ```
pub fn internet_checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;

    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
    }

    if let Some(&byte) = chunks.remainder().first() {
        sum += (byte as u32) << 8;
    }

    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    !sum as u16
}

/// Calculates the TCP checksum over the IPv4 pseudo-header and `segment`.
///
/// # Arguments
///
/// * `src_ip` - IPv4 source address octets
/// * `dst_ip` - IPv4 destination address octets
/// * `protocol` - IP protocol number (6 for TCP)
/// * `segment` - TCP header and payload with the checksum field zeroed
pub fn transport_checksum(src_ip: &[u8; 4], dst_ip: &[u8; 4], protocol: u8, segment: &[u8]) -> u16 {
    let mut pseudo_header = Vec::with_capacity(12 + segment.len());

    pseudo_header.extend_from_slice(src_ip);
    pseudo_header.extend_from_slice(dst_ip);
    pseudo_header.push(0);
    pseudo_header.push(protocol);
    pseudo_header.extend_from_slice(&(segment.len() as u16).to_be_bytes());
    pseudo_header.extend_from_slice(segment);

    internet_checksum(&pseudo_header)
}

/// Returns true when `data`, checksum field included, sums to zero.
pub fn validate_checksum(data: &[u8]) -> bool {
    let result = internet_checksum(data);
    result == 0 || result == 0xFFFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internet_checksum_empty() {
        assert_eq!(internet_checksum(&[]), 0xFFFF);
    }

    #[test]
    fn test_internet_checksum_rfc1071_sample() {
        // RFC 1071 section 3 example: sum is 0xddf2, checksum its complement
        let data = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
        assert_eq!(internet_checksum(&data), !0xddf2u16);
    }

    #[test]
    fn test_internet_checksum_odd_length() {
        // Trailing byte is treated as the high half of a word
        assert_eq!(internet_checksum(&[0x00, 0x01, 0x02]), !0x0201u16);
    }

    #[test]
    fn test_validate_checksum() {
        let data = vec![0x45, 0x00, 0x00, 0x3c];
        let checksum = internet_checksum(&data);

        let mut data_with_checksum = data;
        data_with_checksum.extend_from_slice(&checksum.to_be_bytes());

        assert!(validate_checksum(&data_with_checksum));
    }

    #[test]
    fn test_transport_checksum_validates() {
        let src_ip = [192, 168, 1, 100];
        let dst_ip = [192, 168, 1, 195];

        // 20 byte TCP header, checksum field zero
        let mut segment = vec![0u8; 20];
        segment[0..2].copy_from_slice(&1234u16.to_be_bytes());
        segment[2..4].copy_from_slice(&80u16.to_be_bytes());
        segment[12] = 0x50;
        segment[13] = 0x02;

        let checksum = transport_checksum(&src_ip, &dst_ip, 6, &segment);
        segment[16..18].copy_from_slice(&checksum.to_be_bytes());

        let mut pseudo = Vec::new();
        pseudo.extend_from_slice(&src_ip);
        pseudo.extend_from_slice(&dst_ip);
        pseudo.extend_from_slice(&[0, 6]);
        pseudo.extend_from_slice(&(segment.len() as u16).to_be_bytes());
        pseudo.extend_from_slice(&segment);
        assert!(validate_checksum(&pseudo));
    }
}
