// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for record validation and resource record expansion.

#[cfg(test)]
mod tests {
    use crate::errors::RecordError;
    use crate::record::{fqdn, split_txt, MxRecord, Record, SrvRecord};
    use hickory_client::rr::{rdata, DNSClass, Name, RData, Record as ResourceRecord};
    use std::str::FromStr;

    const TEST_ZONE: &str = "example.com.";

    fn owner(label: &str) -> String {
        format!("{label}.{TEST_ZONE}")
    }

    fn rr(name: &str, ttl: u32, data: RData) -> ResourceRecord {
        let mut record = ResourceRecord::from_rdata(Name::from_str(name).unwrap(), ttl, data);
        record.set_dns_class(DNSClass::IN);
        record
    }

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    fn txt_chunks(record: &ResourceRecord) -> Vec<Vec<u8>> {
        match record.data() {
            Some(RData::TXT(txt)) => txt.txt_data().iter().map(|b| b.to_vec()).collect(),
            other => panic!("expected TXT data, got {other:?}"),
        }
    }

    #[test]
    fn test_records_a() {
        let record = Record {
            fqdn: owner("a"),
            host: vec!["192.0.2.1".parse().unwrap()],
            ttl: 300,
            ..Record::default()
        };

        let expected = vec![rr(
            "a.example.com.",
            300,
            RData::A("192.0.2.1".parse::<std::net::Ipv4Addr>().unwrap().into()),
        )];
        assert_eq!(record.records().unwrap(), expected);
    }

    #[test]
    fn test_records_host_multiple_keeps_order_and_family() {
        let record = Record {
            fqdn: owner("host"),
            host: vec![
                "192.0.2.1".parse().unwrap(),
                "192.0.2.2".parse().unwrap(),
                "2001:db8::1".parse().unwrap(),
                "2001:db8::2".parse().unwrap(),
            ],
            ttl: 300,
            ..Record::default()
        };

        let records = record.records().unwrap();
        let types: Vec<String> = records
            .iter()
            .map(|r| r.record_type().to_string())
            .collect();
        assert_eq!(types, vec!["A", "A", "AAAA", "AAAA"]);
        assert_eq!(
            records[2],
            rr(
                "host.example.com.",
                300,
                RData::AAAA("2001:db8::1".parse::<std::net::Ipv6Addr>().unwrap().into())
            )
        );
        assert!(records.iter().all(|r| r.dns_class() == DNSClass::IN));
    }

    #[test]
    fn test_records_cname() {
        let record = Record {
            fqdn: owner("cname"),
            cname: Some("abc.example.com.".to_string()),
            ..Record::default()
        };

        assert_eq!(
            record.records().unwrap(),
            vec![rr(
                "cname.example.com.",
                0,
                RData::CNAME(rdata::CNAME(name("abc.example.com.")))
            )]
        );
    }

    #[test]
    fn test_records_mx_targets_are_fully_qualified() {
        let record = Record {
            fqdn: owner("mail"),
            mx: vec![
                MxRecord {
                    preference: 0,
                    mx: "mx1.example.com".to_string(),
                },
                MxRecord {
                    preference: 10,
                    mx: "mx2.example.com".to_string(),
                },
            ],
            ..Record::default()
        };

        assert_eq!(
            record.records().unwrap(),
            vec![
                rr(
                    "mail.example.com.",
                    0,
                    RData::MX(rdata::MX::new(0, name("mx1.example.com.")))
                ),
                rr(
                    "mail.example.com.",
                    0,
                    RData::MX(rdata::MX::new(10, name("mx2.example.com.")))
                ),
            ]
        );
    }

    #[test]
    fn test_records_srv() {
        let record = Record {
            fqdn: owner("srv"),
            srv: vec![
                SrvRecord {
                    priority: 10,
                    weight: 15,
                    port: 80,
                    target: "www.example.net".to_string(),
                },
                SrvRecord {
                    priority: 20,
                    weight: 15,
                    port: 80,
                    target: "www2.example.net".to_string(),
                },
            ],
            ..Record::default()
        };

        assert_eq!(
            record.records().unwrap(),
            vec![
                rr(
                    "srv.example.com.",
                    0,
                    RData::SRV(rdata::SRV::new(10, 15, 80, name("www.example.net.")))
                ),
                rr(
                    "srv.example.com.",
                    0,
                    RData::SRV(rdata::SRV::new(20, 15, 80, name("www2.example.net.")))
                ),
            ]
        );
    }

    #[test]
    fn test_records_txt_one_record_per_value() {
        let record = Record {
            fqdn: owner("txt"),
            txt: vec!["123".to_string(), "456".to_string()],
            ..Record::default()
        };

        let records = record.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(txt_chunks(&records[0]), vec![b"123".to_vec()]);
        assert_eq!(txt_chunks(&records[1]), vec![b"456".to_vec()]);
    }

    #[test]
    fn test_records_txt_long_value_is_chunked_in_one_record() {
        let record = Record {
            fqdn: owner("txt"),
            txt: vec!["a".repeat(300)],
            ..Record::default()
        };

        let records = record.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            txt_chunks(&records[0]),
            vec![b"a".repeat(255), b"a".repeat(45)]
        );
    }

    #[test]
    fn test_records_mixed_families_order() {
        let record = Record {
            fqdn: owner("mixed"),
            host: vec!["192.0.2.1".parse().unwrap()],
            txt: vec!["v=spf1 -all".to_string()],
            mx: vec![MxRecord {
                preference: 5,
                mx: "mx.example.com".to_string(),
            }],
            srv: vec![SrvRecord {
                priority: 1,
                weight: 1,
                port: 443,
                target: "svc.example.com".to_string(),
            }],
            ttl: 60,
            ..Record::default()
        };

        let types: Vec<String> = record
            .records()
            .unwrap()
            .iter()
            .map(|r| r.record_type().to_string())
            .collect();
        assert_eq!(types, vec!["A", "TXT", "MX", "SRV"]);
    }

    #[test]
    fn test_split_txt() {
        let alphabet = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let cases = [(4, 1), (10, 10), (15, 4), (578, 255), (255, 255), (256, 255)];

        for (len, max) in cases {
            let input: String = alphabet.chars().cycle().take(len).collect();
            let chunks = split_txt(&input, max);

            assert_eq!(chunks.len(), len.div_ceil(max), "len={len} max={max}");
            for (i, chunk) in chunks.iter().enumerate() {
                if i == chunks.len() - 1 {
                    assert!(chunk.len() <= max);
                } else {
                    assert_eq!(chunk.len(), max);
                }
            }
            assert_eq!(chunks.concat(), input.as_bytes());
        }
    }

    #[test]
    fn test_split_txt_multibyte_is_lossless() {
        let input = "é".repeat(200);
        let chunks = split_txt(&input, 255);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.concat(), input.as_bytes());
    }

    #[test]
    fn test_validate_single_family_ok() {
        let records = [
            Record {
                host: vec!["192.0.2.1".parse().unwrap()],
                ..Record::default()
            },
            Record {
                txt: vec!["abc".to_string()],
                ..Record::default()
            },
            Record {
                mx: vec![MxRecord {
                    preference: 1,
                    mx: "mx.example.com".to_string(),
                }],
                ..Record::default()
            },
            Record {
                srv: vec![SrvRecord {
                    target: "svc.example.com".to_string(),
                    ..SrvRecord::default()
                }],
                ..Record::default()
            },
            Record {
                cname: Some("a".to_string()),
                ..Record::default()
            },
        ];

        for record in records {
            assert_eq!(record.validate(), Ok(()), "{record:?}");
        }
    }

    #[test]
    fn test_validate_multiple_non_cname_families_ok() {
        let record = Record {
            host: vec!["192.0.2.1".parse().unwrap()],
            txt: vec!["abc".to_string()],
            ..Record::default()
        };
        assert_eq!(record.validate(), Ok(()));
    }

    #[test]
    fn test_validate_no_types() {
        assert_eq!(Record::default().validate(), Err(RecordError::NoTypes));

        let empty_cname = Record {
            cname: Some(String::new()),
            ..Record::default()
        };
        assert_eq!(empty_cname.validate(), Err(RecordError::NoTypes));
    }

    #[test]
    fn test_validate_cname_with_other_family() {
        let others = [
            Record {
                host: vec!["192.0.2.1".parse().unwrap()],
                ..Record::default()
            },
            Record {
                txt: vec!["abc".to_string()],
                ..Record::default()
            },
            Record {
                mx: vec![MxRecord {
                    preference: 1,
                    mx: "mx.example.com".to_string(),
                }],
                ..Record::default()
            },
            Record {
                srv: vec![SrvRecord {
                    target: "svc.example.com".to_string(),
                    ..SrvRecord::default()
                }],
                ..Record::default()
            },
        ];

        for mut record in others {
            record.cname = Some("a.example.com".to_string());
            assert_eq!(record.validate(), Err(RecordError::CnameConflict));
        }
    }

    #[test]
    fn test_validate_empty_txt_value() {
        let record = Record {
            txt: vec!["abc".to_string(), String::new()],
            ..Record::default()
        };
        assert_eq!(record.validate(), Err(RecordError::EmptyTxt));
    }

    #[test]
    fn test_validate_mx_without_target() {
        let record = Record {
            mx: vec![MxRecord {
                preference: 10,
                mx: String::new(),
            }],
            ..Record::default()
        };
        assert_eq!(record.validate(), Err(RecordError::MissingMxTarget));
    }

    #[test]
    fn test_validate_srv_without_target() {
        let record = Record {
            srv: vec![SrvRecord {
                priority: 1,
                weight: 1,
                port: 80,
                target: String::new(),
            }],
            ..Record::default()
        };
        assert_eq!(record.validate(), Err(RecordError::MissingSrvTarget));
    }

    #[test]
    fn test_validate_invalid_target_name() {
        let record = Record {
            fqdn: owner("bad"),
            cname: Some(format!("{}.example.com", "x".repeat(70))),
            ..Record::default()
        };
        assert!(matches!(
            record.validate(),
            Err(RecordError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_init_inherits_ttl_only_when_unset() {
        let mut inherited = Record::default();
        inherited.init(owner("a"), 3600);
        assert_eq!(inherited.ttl, 3600);
        assert_eq!(inherited.fqdn, "a.example.com.");

        let mut explicit = Record {
            ttl: 60,
            ..Record::default()
        };
        explicit.init(owner("b"), 3600);
        assert_eq!(explicit.ttl, 60);
    }

    #[test]
    fn test_fqdn() {
        assert_eq!(fqdn("example.com"), "example.com.");
        assert_eq!(fqdn("example.com."), "example.com.");
    }
}
