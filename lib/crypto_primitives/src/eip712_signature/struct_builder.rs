use zksync_basic_types::H256;

/// Visitor that receives the members of an [`EIP712TypedStructure`] one by one, in declaration order.
///
/// [`EIP712TypedStructure`]: super::typed_structure::EIP712TypedStructure
pub trait StructBuilder {
    fn add_member<MEMBER: StructMember + ?Sized>(&mut self, name: &str, member: &MEMBER);
}

/// A value that can be a member of an EIP-712 structure.
pub trait StructMember {
    /// Name of the member type in the type encoding, e.g. `uint256` or `bytes32[]`.
    const MEMBER_TYPE: &'static str;

    /// 32-byte encoding of the value, as used in `encodeData`.
    fn encode_member_data(&self) -> H256;
}

/// Collects `<type> <name>` pairs to produce the `encodeType` string.
#[derive(Debug, Default)]
pub(crate) struct TypeBuilder {
    members: Vec<String>,
}

impl TypeBuilder {
    pub fn encode_type(&self, type_name: &str) -> String {
        format!("{type_name}({})", self.members.join(","))
    }
}

impl StructBuilder for TypeBuilder {
    fn add_member<MEMBER: StructMember + ?Sized>(&mut self, name: &str, _member: &MEMBER) {
        self.members.push(format!("{} {name}", MEMBER::MEMBER_TYPE));
    }
}

/// Collects encoded member values to produce `encodeData`.
#[derive(Debug, Default)]
pub(crate) struct EncodeBuilder {
    members: Vec<H256>,
}

impl EncodeBuilder {
    pub fn encoded_data(&self) -> Vec<u8> {
        self.members
            .iter()
            .flat_map(|member| member.as_bytes().iter().copied())
            .collect()
    }
}

impl StructBuilder for EncodeBuilder {
    fn add_member<MEMBER: StructMember + ?Sized>(&mut self, _name: &str, member: &MEMBER) {
        self.members.push(member.encode_member_data());
    }
}
