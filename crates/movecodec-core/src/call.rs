//! Types for script-function calls, resolved signatures and decoded arguments.

use crate::error::ResolverError;
use crate::types::TypeTag;
use crate::value::MoveValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Fully-qualified function identifier: `address::module::function`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FunctionId {
    pub address: String,
    pub module: String,
    pub function: String,
}

impl FunctionId {
    pub fn new(
        address: impl Into<String>,
        module: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            module: module.into(),
            function: function.into(),
        }
    }

    /// Same function with the address in short lowercase form, so that
    /// `0x00000000000000000000000000000001` and `0x1` compare equal.
    pub fn normalized(&self) -> Self {
        let hex = self.address.trim_start_matches("0x").to_ascii_lowercase();
        let trimmed = hex.trim_start_matches('0');
        let address = if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{trimmed}")
        };
        Self::new(address, self.module.clone(), self.function.clone())
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.function)
    }
}

impl FromStr for FunctionId {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ResolverError::InvalidFunctionId {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        let parts: Vec<&str> = s.trim().split("::").collect();
        let [address, module, function] = parts.as_slice() else {
            return Err(invalid("expected address::module::function"));
        };
        let hex = address
            .strip_prefix("0x")
            .ok_or_else(|| invalid("address must be 0x-prefixed"))?;
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("address must be hex"));
        }
        if module.is_empty() || function.is_empty() {
            return Err(invalid("module and function must be non-empty"));
        }
        Ok(Self::new(*address, *module, *function))
    }
}

impl TryFrom<String> for FunctionId {
    type Error = ResolverError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FunctionId> for String {
    fn from(id: FunctionId) -> Self {
        id.to_string()
    }
}

/// One declared parameter of a resolved function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub type_tag: TypeTag,
    #[serde(default)]
    pub doc: String,
}

/// Result of `contract.resolve_function`. Fields the decoder does not use
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFunction {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub doc: String,
    pub args: Vec<ParameterDescriptor>,
}

impl ResolvedFunction {
    pub fn first_is_signer(&self) -> bool {
        self.args.first().is_some_and(|p| p.type_tag.is_signer())
    }
}

/// A script-function call as carried in a transaction payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptFunctionCall {
    pub func: FunctionId,
    #[serde(default)]
    pub ty_args: Vec<TypeTag>,
    /// BCS-encoded arguments, `0x`-prefixed hex.
    pub args: Vec<String>,
}

/// One argument after decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedArgument {
    /// Position in the call's argument list.
    pub index: usize,
    /// The original hex argument.
    pub raw: String,
    /// Declared parameter this argument was matched to, if any.
    pub param: Option<ParameterDescriptor>,
    /// `None` when decoding was not attempted, failed, or hit an unsupported tag.
    pub value: Option<MoveValue>,
}

impl DecodedArgument {
    pub fn raw(index: usize, raw: impl Into<String>) -> Self {
        Self {
            index,
            raw: raw.into(),
            param: None,
            value: None,
        }
    }

    pub fn is_decoded(&self) -> bool {
        self.value.is_some()
    }

    /// The decoded value, or the raw hex when there is none.
    pub fn value_text(&self) -> String {
        match &self.value {
            Some(v) => v.to_string(),
            None => self.raw.clone(),
        }
    }
}

/// `"{type}: {value}"` when a parameter was matched, otherwise the raw hex.
impl fmt::Display for DecodedArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(p) => write!(f, "{}: {}", p.type_tag, self.value_text()),
            None => f.write_str(&self.raw),
        }
    }
}

/// Result of decoding a script-function call.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedCall {
    pub func: FunctionId,
    pub ty_args: Vec<TypeTag>,
    /// Arguments in call order; always one entry per raw argument.
    pub arguments: Vec<DecodedArgument>,
    /// Arguments that failed to decode (argument index → error message).
    pub decode_errors: BTreeMap<usize, String>,
}

impl DecodedCall {
    /// Look up a decoded argument by its declared parameter name.
    pub fn argument(&self, name: &str) -> Option<&DecodedArgument> {
        self.arguments
            .iter()
            .find(|a| a.param.as_ref().is_some_and(|p| p.name == name))
    }

    /// Returns true if no argument hit a decode error.
    pub fn is_clean(&self) -> bool {
        self.decode_errors.is_empty()
    }

    /// Display strings, one per argument, in call order.
    pub fn display_args(&self) -> Vec<String> {
        self.arguments.iter().map(|a| a.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    #[test]
    fn function_id_round_trip() {
        let id: FunctionId = "0x1::TransferScripts::peer_to_peer_v2".parse().unwrap();
        assert_eq!(id.module, "TransferScripts");
        assert_eq!(id.to_string(), "0x1::TransferScripts::peer_to_peer_v2");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            r#""0x1::TransferScripts::peer_to_peer_v2""#
        );
    }

    #[test]
    fn function_id_normalizes_address() {
        let long: FunctionId = "0x00000000000000000000000000000001::Account::create"
            .parse()
            .unwrap();
        assert_eq!(long.normalized(), FunctionId::new("0x1", "Account", "create"));
        assert_eq!(FunctionId::new("0x000", "M", "f").normalized().address, "0x0");
        assert_eq!(FunctionId::new("0xA550C18", "M", "f").normalized().address, "0xa550c18");
    }

    #[test]
    fn function_id_rejects_bad_input() {
        assert!("0x1::TransferScripts".parse::<FunctionId>().is_err());
        assert!("1::A::b".parse::<FunctionId>().is_err());
        assert!("0xzz::A::b".parse::<FunctionId>().is_err());
        assert!("0x1::::b".parse::<FunctionId>().is_err());
    }

    #[test]
    fn resolved_function_ignores_extra_fields() {
        let json = r#"{
            "name": "peer_to_peer_v2",
            "doc": "",
            "ty_args": [{"name": "T", "abilities": ["Store"]}],
            "args": [
                {"name": "account", "type_tag": "Signer", "doc": ""},
                {"name": "payee", "type_tag": "Address", "doc": ""},
                {"name": "amount", "type_tag": "U128"}
            ],
            "returns": []
        }"#;
        let f: ResolvedFunction = serde_json::from_str(json).unwrap();
        assert_eq!(f.args.len(), 3);
        assert!(f.first_is_signer());
        assert_eq!(f.args[2].type_tag, TypeTag::Primitive(PrimitiveKind::U128));
    }

    fn param(name: &str, kind: PrimitiveKind) -> ParameterDescriptor {
        ParameterDescriptor {
            name: name.into(),
            type_tag: kind.into(),
            doc: String::new(),
        }
    }

    #[test]
    fn argument_display_prefers_decoded_value() {
        let mut arg = DecodedArgument::raw(0, "0x0a00000000000000");
        assert_eq!(arg.to_string(), "0x0a00000000000000");

        arg.param = Some(param("amount", PrimitiveKind::U64));
        assert_eq!(arg.to_string(), "u64: 0x0a00000000000000");

        arg.value = Some(MoveValue::U64(10));
        assert_eq!(arg.to_string(), "u64: 10");
        assert!(arg.is_decoded());
    }

    #[test]
    fn decoded_call_lookup_by_param_name() {
        let mut amount = DecodedArgument::raw(1, "0x01");
        amount.param = Some(param("amount", PrimitiveKind::U8));
        amount.value = Some(MoveValue::U8(1));
        let call = DecodedCall {
            func: FunctionId::new("0x1", "M", "f"),
            ty_args: vec![],
            arguments: vec![DecodedArgument::raw(0, "0xff"), amount],
            decode_errors: BTreeMap::new(),
        };
        assert!(call.is_clean());
        assert_eq!(call.argument("amount").map(|a| a.index), Some(1));
        assert!(call.argument("payee").is_none());
        assert_eq!(call.display_args(), vec!["0xff", "u8: 1"]);
    }
}
