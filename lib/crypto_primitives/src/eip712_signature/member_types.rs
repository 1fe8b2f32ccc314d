use zksync_basic_types::{address_to_h256, keccak256, u256_to_h256, Address, H256, U256};

use super::struct_builder::StructMember;

impl StructMember for U256 {
    const MEMBER_TYPE: &'static str = "uint256";

    fn encode_member_data(&self) -> H256 {
        u256_to_h256(*self)
    }
}

impl StructMember for H256 {
    const MEMBER_TYPE: &'static str = "bytes32";

    fn encode_member_data(&self) -> H256 {
        *self
    }
}

impl StructMember for Address {
    const MEMBER_TYPE: &'static str = "address";

    fn encode_member_data(&self) -> H256 {
        address_to_h256(self)
    }
}

impl StructMember for str {
    const MEMBER_TYPE: &'static str = "string";

    fn encode_member_data(&self) -> H256 {
        keccak256(self.as_bytes()).into()
    }
}

impl StructMember for String {
    const MEMBER_TYPE: &'static str = "string";

    fn encode_member_data(&self) -> H256 {
        self.as_str().encode_member_data()
    }
}

// Dynamic `bytes` are encoded as the hash of their contents.
impl StructMember for [u8] {
    const MEMBER_TYPE: &'static str = "bytes";

    fn encode_member_data(&self) -> H256 {
        keccak256(self).into()
    }
}

impl StructMember for [H256] {
    const MEMBER_TYPE: &'static str = "bytes32[]";

    fn encode_member_data(&self) -> H256 {
        let concatenated: Vec<u8> = self
            .iter()
            .flat_map(|item| item.as_bytes().iter().copied())
            .collect();
        keccak256(&concatenated).into()
    }
}
