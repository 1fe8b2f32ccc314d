use serde::{Deserialize, Serialize};
use zksync_basic_types::{keccak256, L2ChainId, H256, U256};

use super::struct_builder::{EncodeBuilder, StructBuilder, TypeBuilder};

/// Structure that can be hashed and signed according to EIP-712.
///
/// Only flat structures are supported: every member must be an atomic or dynamic
/// EIP-712 type, so `encodeType` consists of the single primary type.
pub trait EIP712TypedStructure {
    const TYPE_NAME: &'static str;

    fn build_structure<BUILDER: StructBuilder>(&self, builder: &mut BUILDER);

    fn encode_type(&self) -> String {
        let mut builder = TypeBuilder::default();
        self.build_structure(&mut builder);
        builder.encode_type(Self::TYPE_NAME)
    }

    fn type_hash(&self) -> H256 {
        keccak256(self.encode_type().as_bytes()).into()
    }

    fn encode_data(&self) -> Vec<u8> {
        let mut builder = EncodeBuilder::default();
        self.build_structure(&mut builder);
        builder.encoded_data()
    }

    /// `hashStruct(s) = keccak256(typeHash ‖ encodeData(s))`.
    fn hash_struct(&self) -> H256 {
        let mut bytes = self.type_hash().as_bytes().to_vec();
        bytes.extend_from_slice(&self.encode_data());
        keccak256(&bytes).into()
    }
}

/// Domain separator of the signed transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
    /// The user readable name of signing domain, i.e. the name of the DApp or the protocol.
    pub name: String,
    /// The current major version of the signing domain.
    pub version: String,
    /// The [EIP-155](https://eips.ethereum.org/EIPS/eip-155) chain id.
    pub chain_id: U256,
}

impl Eip712Domain {
    /// Name of the protocol.
    pub const NAME: &'static str = "zkSync";
    /// Version of the protocol. While there may be `2.x` releases, the minor release version bump
    /// should not be breaking, meaning that clients from the `2.x-1` version should be able to communicate
    /// with zkSync server. Thus `VERSION` corresponds to the major version only.
    pub const VERSION: &'static str = "2";

    pub fn new(chain_id: L2ChainId) -> Self {
        Self {
            name: Self::NAME.to_string(),
            version: Self::VERSION.to_string(),
            chain_id: U256::from(chain_id.as_u64()),
        }
    }
}

impl EIP712TypedStructure for Eip712Domain {
    const TYPE_NAME: &'static str = "EIP712Domain";

    fn build_structure<BUILDER: StructBuilder>(&self, builder: &mut BUILDER) {
        builder.add_member("name", self.name.as_str());
        builder.add_member("version", self.version.as_str());
        builder.add_member("chainId", &self.chain_id);
    }
}
