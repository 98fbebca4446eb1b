//! Per-run variables exposed to scripts as `vars`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::document::node::Node;

/// Machine-specific values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    /// Whether to include debug configuration.
    pub debug: bool,
    /// Value for `SystemProductName`.
    pub product: String,
    /// Logic board serial number.
    pub mlb: String,
    /// The 6-byte ROM value, decoded.
    pub rom: Vec<u8>,
    pub serial_number: String,
    /// SMBIOS unique system identifier.
    pub uuid: String,
}

impl Variables {
    /// Decodes a base64 ROM value as given on the command line.
    ///
    /// The ROM is kept as raw bytes so it is written back as `<data>`.
    pub fn decode_rom(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(encoded.trim())
    }
}

impl From<&Variables> for Node {
    fn from(vars: &Variables) -> Self {
        [
            ("Debug", Node::from(vars.debug)),
            ("Product", Node::from(vars.product.as_str())),
            ("MLB", Node::from(vars.mlb.as_str())),
            ("ROM", Node::from(vars.rom.clone())),
            ("SerialNumber", Node::from(vars.serial_number.as_str())),
            ("UUID", Node::from(vars.uuid.as_str())),
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rom() {
        assert_eq!(
            Variables::decode_rom("ESIzRFVm").unwrap(),
            vec![0x11, 0x22, 0x33, 0x44, 0x55, 0x66]
        );
        assert!(Variables::decode_rom("not base64!").is_err());
    }

    #[test]
    fn test_namespace_fields() {
        let vars = Variables {
            product: "iMac20,1".to_string(),
            rom: vec![1, 2, 3, 4, 5, 6],
            ..Variables::default()
        };
        let node = Node::from(&vars);
        let fields = node.as_mapping().unwrap();
        assert_eq!(fields["Product"], Node::from("iMac20,1"));
        assert_eq!(fields["ROM"], Node::from(vec![1u8, 2, 3, 4, 5, 6]));
        assert_eq!(fields["Debug"], Node::from(false));
        assert_eq!(fields.len(), 6);
    }
}
