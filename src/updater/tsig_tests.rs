// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for TSIG helpers.

#[cfg(test)]
mod tests {
    use crate::config::{KeyAlgorithm, TsigKeyConfig};
    use crate::updater::tsig::{create_tsig_signer, gss_tsig_record};
    use anyhow::anyhow;
    use hickory_client::op::{Message, OpCode};
    use hickory_client::rr::rdata::tsig::TsigAlgorithm;
    use hickory_client::rr::{DNSClass, RData, RecordType};
    use hickory_proto::rr::dnssec::rdata::DNSSECRData;
    use hickory_proto::serialize::binary::BinEncodable;

    fn message(id: u16) -> Message {
        let mut message = Message::new();
        message.set_id(id).set_op_code(OpCode::Update);
        message
    }

    #[test]
    fn test_gss_tsig_record() {
        let message = message(42);
        let mut signed = Vec::new();

        let record = gss_tsig_record(&message, "1234.sig-ns1.example.com.", 1_700_000_000, |data| {
            signed = data.to_vec();
            Ok(b"mic".to_vec())
        })
        .unwrap();

        assert_eq!(record.record_type(), RecordType::TSIG);
        assert_eq!(record.dns_class(), DNSClass::ANY);
        assert_eq!(record.ttl(), 0);
        assert_eq!(record.name().to_string(), "1234.sig-ns1.example.com.");

        match record.data() {
            Some(RData::DNSSEC(DNSSECRData::TSIG(tsig))) => {
                assert_eq!(*tsig.algorithm(), TsigAlgorithm::Gss);
                assert_eq!(tsig.time(), 1_700_000_000);
                assert_eq!(tsig.fudge(), 300);
                assert_eq!(tsig.oid(), 42);
                assert_eq!(tsig.mac(), b"mic");
            }
            other => panic!("expected TSIG data, got {other:?}"),
        }

        // The signed data starts with the wire form of the unsigned message.
        let wire = message.to_bytes().unwrap();
        assert!(signed.len() > wire.len());
        assert_eq!(&signed[..wire.len()], wire.as_slice());
    }

    #[test]
    fn test_gss_tsig_record_mac_failure() {
        let err = gss_tsig_record(&message(1), "k.example.com.", 0, |_| {
            Err(anyhow!("context expired"))
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("context expired"));
    }

    #[test]
    fn test_gss_tsig_record_invalid_key_name() {
        let name = format!("{}.example.com.", "k".repeat(64));
        let mut called = false;
        assert!(gss_tsig_record(&message(1), &name, 0, |_| {
            called = true;
            Ok(Vec::new())
        })
        .is_err());
        assert!(!called);
    }

    #[test]
    fn test_create_tsig_signer() {
        for algorithm in [
            KeyAlgorithm::HmacSha256,
            KeyAlgorithm::HmacSha384,
            KeyAlgorithm::HmacSha512,
        ] {
            let key = TsigKeyConfig {
                name: "update-key".to_string(),
                algorithm,
                secret: "dGVzdHNlY3JldA==".to_string(),
            };
            assert!(create_tsig_signer(&key).is_ok(), "{}", algorithm.as_str());
        }
    }

    #[test]
    fn test_create_tsig_signer_bad_secret() {
        let key = TsigKeyConfig {
            name: "update-key".to_string(),
            algorithm: KeyAlgorithm::HmacSha256,
            secret: "not base64!".to_string(),
        };
        assert!(create_tsig_signer(&key).is_err());
    }
}
