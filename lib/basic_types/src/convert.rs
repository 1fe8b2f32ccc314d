use crate::{keccak256, Address, H256, U256};

pub fn h256_to_u256(num: H256) -> U256 {
    U256::from_big_endian(num.as_bytes())
}

pub fn address_to_h256(address: &Address) -> H256 {
    let mut buffer = [0u8; 32];
    buffer[12..].copy_from_slice(address.as_bytes());
    H256(buffer)
}

pub fn address_to_u256(address: &Address) -> U256 {
    h256_to_u256(address_to_h256(address))
}

pub fn u256_to_h256(num: U256) -> H256 {
    let mut bytes = [0u8; 32];
    num.to_big_endian(&mut bytes);
    H256::from_slice(&bytes)
}

/// Takes the low 20 bytes of a 32-byte word, e.g. an indexed `address` event topic.
pub fn h256_to_address(value: &H256) -> Address {
    Address::from_slice(&value.as_bytes()[12..])
}

/// Formats an address with the mixed-case checksum from EIP-55.
pub fn to_checksum_address(address: &Address) -> String {
    let lowercase = hex::encode(address.as_bytes());
    let hash = keccak256(lowercase.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (i, ch) in lowercase.chars().enumerate() {
        // Each hex char of the address maps to a nibble of the hash.
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if nibble >= 8 {
            checksummed.push(ch.to_ascii_uppercase());
        } else {
            checksummed.push(ch);
        }
    }
    checksummed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_h256_conversion() {
        let value = U256::from(0x1234_5678_u64);
        assert_eq!(h256_to_u256(u256_to_h256(value)), value);
        assert_eq!(u256_to_h256(value).as_bytes()[28..], [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_address_h256_conversion() {
        let address = Address::repeat_byte(0xaa);
        let word = address_to_h256(&address);
        assert_eq!(word.as_bytes()[..12], [0; 12]);
        assert_eq!(h256_to_address(&word), address);
        assert_eq!(address_to_u256(&address), h256_to_u256(word));
    }

    #[test]
    fn checksum_matches_eip55_vectors() {
        let vectors = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];
        for expected in vectors {
            let address: Address = expected.to_lowercase().parse().unwrap();
            assert_eq!(to_checksum_address(&address), expected);
        }
    }
}
