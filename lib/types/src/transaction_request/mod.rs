use rlp::{DecoderError, Rlp, RlpStream};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    bytecode::{hash_bytecode, validate_bytecode, InvalidBytecodeError},
    fee::Fee,
    keccak256, u256_to_h256, Address, Bytes, EIP712TypedStructure, Eip712Domain, L2ChainId,
    PackedEthSignature, StructBuilder, DEFAULT_L2_TX_GAS_PER_PUBDATA_BYTE, EIP_712_TX_TYPE, H256,
    U256, U64,
};

#[cfg(test)]
mod tests;

/// Call contract request (eth_call / eth_estimateGas)
///
/// When using this for `eth_estimateGas`, all the fields
/// are optional. However, for usage in `eth_call` the
/// `to` field must be provided.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Sender address (None for arbitrary address)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// To address (None allowed for eth_estimateGas)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Supplied gas (None for sensible default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    /// Gas price (None for sensible default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
    /// Transferred value (None for no transfer)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Data (None for empty data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// Nonce
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<U64>,
    /// EIP712 meta
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eip712_meta: Option<Eip712Meta>,
}

impl CallRequest {
    /// Function to return a builder for a Call Request
    pub fn builder() -> CallRequestBuilder {
        CallRequestBuilder::default()
    }
}

/// Call Request Builder
#[derive(Clone, Debug, Default)]
pub struct CallRequestBuilder {
    call_request: CallRequest,
}

impl CallRequestBuilder {
    /// Set sender address (None for arbitrary address)
    pub fn from(mut self, from: Address) -> Self {
        self.call_request.from = Some(from);
        self
    }

    /// Set to address (None allowed for eth_estimateGas)
    pub fn to(mut self, to: Option<Address>) -> Self {
        self.call_request.to = to;
        self
    }

    /// Set supplied gas (None for sensible default)
    pub fn gas(mut self, gas: U256) -> Self {
        self.call_request.gas = Some(gas);
        self
    }

    pub fn gas_price(mut self, gas_price: U256) -> Self {
        self.call_request.gas_price = Some(gas_price);
        self
    }

    pub fn max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: U256) -> Self {
        self.call_request.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
        self
    }

    /// Set transferred, value (None for no transfer)
    pub fn value(mut self, value: U256) -> Self {
        self.call_request.value = Some(value);
        self
    }

    /// Set data (None for empty data)
    pub fn data(mut self, data: Bytes) -> Self {
        self.call_request.data = Some(data);
        self
    }

    pub fn nonce(mut self, nonce: U256) -> Self {
        self.call_request.nonce = Some(nonce);
        self
    }

    pub fn transaction_type(mut self, transaction_type: U64) -> Self {
        self.call_request.transaction_type = Some(transaction_type);
        self
    }

    /// Set meta
    pub fn eip712_meta(mut self, eip712_meta: Eip712Meta) -> Self {
        self.call_request.eip712_meta = Some(eip712_meta);
        self
    }

    /// build the Call Request
    pub fn build(&self) -> CallRequest {
        self.call_request.clone()
    }
}

#[derive(Debug, Error)]
pub enum SerializationTransactionError {
    #[error("transaction type is not supported")]
    UnknownTransactionFormat,
    #[error("incompleteSignature")]
    IncompleteSignature,
    #[error("fromAddressIsNull")]
    FromAddressIsNull,
    #[error("eip712MetaIsNull")]
    Eip712MetaIsNull,
    #[error("decodeRlpError {0}")]
    DecodeRlpError(#[from] DecoderError),
    #[error("invalid signature")]
    MalformedSignature,
    #[error("wrong chain id {}", .0.unwrap_or_default())]
    WrongChainId(Option<u64>),
    #[error("malformed paymaster params")]
    MalforedPaymasterParams,
    #[error("factory dependency #{0} is invalid: {1}")]
    InvalidFactoryDependencies(usize, InvalidBytecodeError),
    #[error("gas per pub data limit is zero")]
    GasPerPubDataLimitZero,
}

/// L2 transaction of the EIP-712 type (`0x71`), before or after signing.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TransactionRequest {
    /// Nonce
    pub nonce: U256,
    pub from: Option<Address>,
    /// Recipient
    pub to: Option<Address>,
    /// Transferred value
    pub value: U256,
    /// Max fee per gas
    pub gas_price: U256,
    /// Gas limit
    pub gas: U256,
    /// EIP-1559 part of gas price that goes to miners
    pub max_priority_fee_per_gas: Option<U256>,
    /// Input data
    pub input: Bytes,
    /// ECDSA recovery id
    pub v: Option<U64>,
    /// ECDSA signature r, 32 bytes
    pub r: Option<U256>,
    /// ECDSA signature s, 32 bytes
    pub s: Option<U256>,
    /// Raw transaction data
    pub raw: Option<Bytes>,
    /// Transaction type, `Some(0x71)` for all transactions built by the client
    pub transaction_type: Option<U64>,
    pub eip712_meta: Option<Eip712Meta>,
    /// Chain ID
    pub chain_id: Option<u64>,
}

#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Debug, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymasterParams {
    pub paymaster: Address,
    pub paymaster_input: Vec<u8>,
}

impl PaymasterParams {
    fn from_vector(value: Vec<Vec<u8>>) -> Result<Option<Self>, SerializationTransactionError> {
        if value.is_empty() {
            return Ok(None);
        }
        if value.len() != 2 || value[0].len() != 20 {
            return Err(SerializationTransactionError::MalforedPaymasterParams);
        }

        let result = Some(Self {
            paymaster: Address::from_slice(&value[0]),
            paymaster_input: value[1].clone(),
        });

        Ok(result)
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Meta {
    pub gas_per_pubdata: U256,
    #[serde(default)]
    pub factory_deps: Vec<Vec<u8>>,
    pub custom_signature: Option<Vec<u8>>,
    pub paymaster_params: Option<PaymasterParams>,
}

impl Default for Eip712Meta {
    fn default() -> Self {
        Self {
            gas_per_pubdata: DEFAULT_L2_TX_GAS_PER_PUBDATA_BYTE.into(),
            factory_deps: Vec::new(),
            custom_signature: None,
            paymaster_params: None,
        }
    }
}

impl Eip712Meta {
    pub fn rlp_append(&self, rlp: &mut RlpStream) {
        rlp.append(&self.gas_per_pubdata);
        rlp.begin_list(self.factory_deps.len());
        for dep in &self.factory_deps {
            rlp.append(&dep.as_slice());
        }

        rlp_opt(rlp, &self.custom_signature);

        if let Some(paymaster_params) = &self.paymaster_params {
            rlp.begin_list(2);
            rlp.append(&paymaster_params.paymaster.as_bytes());
            rlp.append(&paymaster_params.paymaster_input);
        } else {
            rlp.begin_list(0);
        }
    }
}

impl EIP712TypedStructure for TransactionRequest {
    const TYPE_NAME: &'static str = "Transaction";

    // Signing goes through `check_signable()` first, so a missing sender or meta
    // only ever reaches this point for hashing of unsigned drafts.
    fn build_structure<BUILDER: StructBuilder>(&self, builder: &mut BUILDER) {
        let meta = self.eip712_meta.clone().unwrap_or_default();
        builder.add_member(
            "txType",
            &self
                .transaction_type
                .map(|x| U256::from(x.as_u64()))
                .unwrap_or_else(|| U256::from(EIP_712_TX_TYPE)),
        );
        builder.add_member(
            "from",
            &U256::from(self.from.unwrap_or_default().as_bytes()),
        );
        builder.add_member("to", &U256::from(self.to.unwrap_or_default().as_bytes()));
        builder.add_member("gasLimit", &self.gas);
        builder.add_member("gasPerPubdataByteLimit", &meta.gas_per_pubdata);
        builder.add_member("maxFeePerGas", &self.gas_price);
        builder.add_member(
            "maxPriorityFeePerGas",
            &self.max_priority_fee_per_gas.unwrap_or(self.gas_price),
        );
        builder.add_member(
            "paymaster",
            &U256::from(self.get_paymaster().unwrap_or_default().as_bytes()),
        );
        builder.add_member("nonce", &self.nonce);
        builder.add_member("value", &self.value);
        builder.add_member("data", self.input.0.as_slice());

        let factory_dep_hashes: Vec<_> = meta
            .factory_deps
            .iter()
            .map(|dep| hash_bytecode(dep).unwrap_or_default())
            .collect();
        builder.add_member("factoryDeps", factory_dep_hashes.as_slice());

        builder.add_member(
            "paymasterInput",
            self.get_paymaster_input().unwrap_or_default().as_slice(),
        );
    }
}

impl TransactionRequest {
    pub fn get_custom_signature(&self) -> Option<Vec<u8>> {
        self.eip712_meta.as_ref()?.custom_signature.clone()
    }

    pub fn get_paymaster(&self) -> Option<Address> {
        Some(
            self.eip712_meta
                .as_ref()?
                .paymaster_params
                .as_ref()?
                .paymaster,
        )
    }

    pub fn get_paymaster_input(&self) -> Option<Vec<u8>> {
        Some(
            self.eip712_meta
                .as_ref()?
                .paymaster_params
                .as_ref()?
                .paymaster_input
                .clone(),
        )
    }

    pub fn get_factory_deps(&self) -> Vec<Vec<u8>> {
        self.eip712_meta
            .as_ref()
            .map(|meta| meta.factory_deps.clone())
            .unwrap_or_default()
    }

    /// Returns a copy of the transaction with only the gas limit replaced.
    ///
    /// Transactions are built with a provisional gas limit of zero, estimated,
    /// and then patched with the estimate before signing.
    #[must_use]
    pub fn with_gas_limit(&self, gas_limit: U256) -> Self {
        Self {
            gas: gas_limit,
            ..self.clone()
        }
    }

    /// Checks that the transaction has everything required to produce a valid EIP-712 signature.
    pub fn check_signable(&self) -> Result<(), SerializationTransactionError> {
        if self.from.is_none() {
            return Err(SerializationTransactionError::FromAddressIsNull);
        }
        if self.chain_id.is_none() {
            return Err(SerializationTransactionError::WrongChainId(None));
        }
        let meta = self
            .eip712_meta
            .as_ref()
            .ok_or(SerializationTransactionError::Eip712MetaIsNull)?;
        if meta.gas_per_pubdata.is_zero() {
            return Err(SerializationTransactionError::GasPerPubDataLimitZero);
        }
        validate_factory_deps(&meta.factory_deps)
    }

    /// Fee parameters of the transaction.
    pub fn get_fee(&self) -> Fee {
        Fee {
            gas_limit: self.gas,
            max_fee_per_gas: self.gas_price,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas.unwrap_or(self.gas_price),
            gas_per_pubdata_limit: self
                .eip712_meta
                .as_ref()
                .map(|meta| meta.gas_per_pubdata)
                .unwrap_or_else(|| DEFAULT_L2_TX_GAS_PER_PUBDATA_BYTE.into()),
        }
    }

    // returns packed eth signature if it is present
    pub fn get_packed_signature(
        &self,
    ) -> Result<PackedEthSignature, SerializationTransactionError> {
        let packed_v = self
            .v
            .ok_or(SerializationTransactionError::IncompleteSignature)?
            .as_u64();
        let v = packed_v
            .try_into()
            .map_err(|_| SerializationTransactionError::MalformedSignature)?;

        let packed_eth_signature = PackedEthSignature::from_rsv(
            &u256_to_h256(
                self.r
                    .ok_or(SerializationTransactionError::IncompleteSignature)?,
            ),
            &u256_to_h256(
                self.s
                    .ok_or(SerializationTransactionError::IncompleteSignature)?,
            ),
            v,
        );

        Ok(packed_eth_signature)
    }

    pub fn get_signature(&self) -> Result<Vec<u8>, SerializationTransactionError> {
        let custom_signature = self.get_custom_signature();
        if let Some(custom_sig) = custom_signature {
            if !custom_sig.is_empty() {
                // There was a custom signature supplied, it overrides
                // the v/r/s signature
                return Ok(custom_sig);
            }
        }

        let packed_eth_signature = self.get_packed_signature()?;

        Ok(packed_eth_signature.serialize_packed().to_vec())
    }

    /// Serializes the signed transaction as `0x71 ‖ rlp(fields)`, ready for `eth_sendRawTransaction`.
    pub fn get_signed_bytes(
        &self,
        signature: &PackedEthSignature,
    ) -> Result<Vec<u8>, SerializationTransactionError> {
        let mut rlp = RlpStream::new();
        self.rlp(&mut rlp, Some(signature))?;
        let mut data = rlp.out().to_vec();
        let tx_type = self
            .transaction_type
            .map_or(EIP_712_TX_TYPE, |tx_type| tx_type.low_u64() as u8);
        data.insert(0, tx_type);
        Ok(data)
    }

    /// Encodes `TransactionRequest` to RLP.
    /// It may fail if `chain_id` is `None`.
    pub fn rlp(
        &self,
        rlp: &mut RlpStream,
        signature: Option<&PackedEthSignature>,
    ) -> Result<(), SerializationTransactionError> {
        if !self.is_eip712_tx() {
            return Err(SerializationTransactionError::UnknownTransactionFormat);
        }
        rlp.begin_unbounded_list();

        rlp.append(&self.nonce);
        rlp_opt(rlp, &self.max_priority_fee_per_gas);
        rlp.append(&self.gas_price);
        rlp.append(&self.gas);
        rlp_opt(rlp, &self.to);
        rlp.append(&self.value);
        rlp.append(&self.input.0);

        if let Some(sig) = signature {
            rlp.append(&sig.v());
            rlp.append(&U256::from_big_endian(sig.r()));
            rlp.append(&U256::from_big_endian(sig.s()));
        }

        rlp.append(
            &self
                .chain_id
                .ok_or(SerializationTransactionError::WrongChainId(None))?,
        );
        rlp_opt(rlp, &self.from);
        if let Some(meta) = &self.eip712_meta {
            meta.rlp_append(rlp);
        }

        rlp.finalize_unbounded_list();
        Ok(())
    }

    pub fn set_signature(&mut self, signature: &PackedEthSignature) {
        self.r = Some(U256::from_big_endian(signature.r()));
        self.s = Some(U256::from_big_endian(signature.s()));
        self.v = Some(signature.v().into())
    }

    /// EIP-712 transactions with no explicit type are treated as `0x71` as well.
    pub fn is_eip712_tx(&self) -> bool {
        self.transaction_type.is_none() || Some(EIP_712_TX_TYPE.into()) == self.transaction_type
    }

    /// Decodes a signed `0x71` payload without checking its chain id.
    pub fn from_bytes_unverified(
        bytes: &[u8],
    ) -> Result<(Self, H256), SerializationTransactionError> {
        let mut tx = match bytes.first() {
            Some(&EIP_712_TX_TYPE) => {
                let rlp = Rlp::new(&bytes[1..]);
                if rlp.item_count()? != 16 {
                    return Err(DecoderError::RlpIncorrectListLen.into());
                }
                Self {
                    nonce: rlp.val_at(0)?,
                    max_priority_fee_per_gas: rlp.val_at(1).ok(),
                    gas_price: rlp.val_at(2)?,
                    gas: rlp.val_at(3)?,
                    to: rlp.val_at(4).ok(),
                    value: rlp.val_at(5)?,
                    input: Bytes(rlp.val_at(6)?),
                    v: Some(rlp.val_at(7)?),
                    r: Some(rlp.val_at(8)?),
                    s: Some(rlp.val_at(9)?),
                    eip712_meta: Some(Eip712Meta {
                        gas_per_pubdata: rlp.val_at(12)?,
                        factory_deps: rlp.list_at(13)?,
                        custom_signature: rlp.val_at(14).ok(),
                        paymaster_params: if let Ok(params) = rlp.list_at(15) {
                            PaymasterParams::from_vector(params)?
                        } else {
                            None
                        },
                    }),
                    chain_id: Some(rlp.val_at(10)?),
                    transaction_type: Some(EIP_712_TX_TYPE.into()),
                    from: Some(rlp.val_at(11)?),
                    ..Default::default()
                }
            }
            _ => return Err(SerializationTransactionError::UnknownTransactionFormat),
        };
        if let Some(meta) = &tx.eip712_meta {
            validate_factory_deps(&meta.factory_deps)?;
        }
        tx.raw = Some(Bytes(bytes.to_vec()));

        let default_signed_message = tx.get_default_signed_message()?;
        // A custom signature is verified by the account contract, not by the client.
        if tx.get_custom_signature().map_or(true, |sig| sig.is_empty()) {
            let signer = tx.recover_default_signer(default_signed_message)?;
            if tx.from != Some(signer) {
                return Err(SerializationTransactionError::MalformedSignature);
            }
        }

        let hash = tx.get_tx_hash_with_signed_message(default_signed_message)?;
        Ok((tx, hash))
    }

    /// Decodes a signed `0x71` payload, checks it was signed for `chain_id`, and verifies the signer.
    pub fn from_bytes(
        bytes: &[u8],
        chain_id: L2ChainId,
    ) -> Result<(Self, H256), SerializationTransactionError> {
        let (tx, hash) = Self::from_bytes_unverified(bytes)?;
        if tx.chain_id.is_some() && tx.chain_id != Some(chain_id.as_u64()) {
            return Err(SerializationTransactionError::WrongChainId(tx.chain_id));
        }
        Ok((tx, hash))
    }

    /// EIP-712 digest the sender signs.
    pub fn get_default_signed_message(&self) -> Result<H256, SerializationTransactionError> {
        let chain_id = self
            .chain_id
            .ok_or(SerializationTransactionError::WrongChainId(None))?;
        Ok(PackedEthSignature::typed_data_to_signed_bytes(
            &Eip712Domain::new(L2ChainId(chain_id)),
            self,
        ))
    }

    fn get_tx_hash_with_signed_message(
        &self,
        signed_message: H256,
    ) -> Result<H256, SerializationTransactionError> {
        let mut bytes = signed_message.as_bytes().to_vec();
        bytes.extend_from_slice(&keccak256(&self.get_signature()?));
        Ok(H256(keccak256(&bytes)))
    }

    /// Hash under which the node indexes the signed transaction.
    pub fn get_tx_hash(&self) -> Result<H256, SerializationTransactionError> {
        let signed_message = self.get_default_signed_message()?;
        self.get_tx_hash_with_signed_message(signed_message)
    }

    fn recover_default_signer(
        &self,
        default_signed_message: H256,
    ) -> Result<Address, SerializationTransactionError> {
        let signature = self.get_packed_signature()?;
        signature
            .signature_recover_signer(&default_signed_message)
            .map_err(|_| SerializationTransactionError::MalformedSignature)
    }
}

impl From<TransactionRequest> for CallRequest {
    fn from(tx: TransactionRequest) -> Self {
        let mut builder = CallRequest::builder()
            .to(tx.to)
            .gas(tx.gas)
            .gas_price(tx.gas_price)
            .value(tx.value)
            .data(tx.input)
            .nonce(tx.nonce)
            .transaction_type(tx.transaction_type.unwrap_or(EIP_712_TX_TYPE.into()));
        if let Some(from) = tx.from {
            builder = builder.from(from);
        }
        if let Some(max_priority_fee_per_gas) = tx.max_priority_fee_per_gas {
            builder = builder.max_priority_fee_per_gas(max_priority_fee_per_gas);
        }
        if let Some(meta) = tx.eip712_meta {
            builder = builder.eip712_meta(meta);
        }
        builder.build()
    }
}

fn rlp_opt<T: rlp::Encodable>(rlp: &mut RlpStream, opt: &Option<T>) {
    if let Some(inner) = opt {
        rlp.append(inner);
    } else {
        rlp.append(&"");
    }
}

pub fn validate_factory_deps(
    factory_deps: &[Vec<u8>],
) -> Result<(), SerializationTransactionError> {
    for (i, dep) in factory_deps.iter().enumerate() {
        validate_bytecode(dep)
            .map_err(|err| SerializationTransactionError::InvalidFactoryDependencies(i, err))?;
    }

    Ok(())
}
