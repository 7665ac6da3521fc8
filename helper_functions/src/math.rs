use integer_sqrt::IntegerSquareRoot;

pub fn integer_squareroot(n: u64) -> u64 {
    n.integer_sqrt()
}

// endianness is not configurable
pub fn int_to_bytes(int: u64, length: usize) -> Vec<u8> {
    let mut vec = int.to_le_bytes().to_vec();
    vec.resize(length, 0);
    vec
}

pub fn bytes_to_int(bytes: [u8; 8]) -> u64 {
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_bytes_value0_length_8() {
        let expected_bytes = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let output = int_to_bytes(0, 8);
        let calculated_bytes = output.as_ref();

        assert_eq!(expected_bytes, calculated_bytes);
    }

    #[test]
    fn test_int_to_bytes_value2521273052_length_8() {
        let expected_bytes = [0xdc, 0x92, 0x47, 0x96, 0x00, 0x00, 0x00, 0x00];
        let output = int_to_bytes(2_521_273_052, 8);
        let calculated_bytes = output.as_ref();

        assert_eq!(expected_bytes, calculated_bytes);
    }

    #[test]
    fn test_int_to_bytes_value4294967295_length_8() {
        let expected_bytes = [0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00];
        let output = int_to_bytes(4_294_967_295, 8);
        let calculated_bytes = output.as_ref();

        assert_eq!(expected_bytes, calculated_bytes);
    }

    #[test]
    fn test_int_to_bytes_value88813769_length_32() {
        let expected_bytes = [
            0xc9, 0x30, 0x4b, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        let output = int_to_bytes(88_813_769, 32);
        let calculated_bytes = output.as_ref();

        assert_eq!(expected_bytes, calculated_bytes);
    }

    #[test]
    fn test_bytes_to_int_round_trip() {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&int_to_bytes(123_456_789, 8));
        assert_eq!(bytes_to_int(bytes), 123_456_789);
    }

    #[test]
    fn test_integer_squareroot() {
        assert_eq!(integer_squareroot(0), 0);
        assert_eq!(integer_squareroot(3), 1);
        assert_eq!(integer_squareroot(4), 2);
        assert_eq!(integer_squareroot(17), 4);
    }
}
