//! Integration tests for constant pool decoding, resolution and encoding.
//!
//! Most tests work on a small hand-assembled pool shaped like the one `javac` emits for a class
//! with a constructor and a string literal, so the byte layout can be checked by eye.

use classpool::prelude::*;
use proptest::prelude::*;

/// `constant_pool_count` followed by:
///
/// ```text
///  #1 Methodref    #2.#3
///  #2 Class        #4
///  #3 NameAndType  #5:#6
///  #4 Utf8         java/lang/Object
///  #5 Utf8         <init>
///  #6 Utf8         ()V
///  #7 Long         1          (also occupies #8)
///  #9 String       #10
/// #10 Utf8         "hi\0"
/// ```
fn object_pool_bytes() -> Vec<u8> {
    let mut data = vec![0x00, 0x0B];
    data.extend_from_slice(&[0x0A, 0x00, 0x02, 0x00, 0x03]);
    data.extend_from_slice(&[0x07, 0x00, 0x04]);
    data.extend_from_slice(&[0x0C, 0x00, 0x05, 0x00, 0x06]);
    data.extend_from_slice(&[0x01, 0x00, 0x10]);
    data.extend_from_slice(b"java/lang/Object");
    data.extend_from_slice(&[0x01, 0x00, 0x06]);
    data.extend_from_slice(b"<init>");
    data.extend_from_slice(&[0x01, 0x00, 0x03]);
    data.extend_from_slice(b"()V");
    data.extend_from_slice(&[0x05, 0, 0, 0, 0, 0, 0, 0, 1]);
    data.extend_from_slice(&[0x08, 0x00, 0x0A]);
    data.extend_from_slice(&[0x01, 0x00, 0x04, b'h', b'i', 0xC0, 0x80]);
    data
}

fn one_of_each() -> Vec<Constant> {
    vec![
        ConstantUtf8::new("java/lang/Object").unwrap().into(),
        ConstantInteger::new(i32::MIN).into(),
        ConstantFloat::new(f32::NAN).into(),
        ConstantLong::new(-1).into(),
        ConstantDouble::new(std::f64::consts::PI).into(),
        ConstantClass::new(1).into(),
        ConstantString::new(1).into(),
        ConstantFieldref::new(6, 11).into(),
        ConstantMethodref::new(6, 11).into(),
        ConstantInterfaceMethodref::new(6, 11).into(),
        ConstantNameAndType::new(1, 1).into(),
        ConstantMethodHandle::new(ReferenceKind::InvokeVirtual, 9).into(),
        ConstantMethodType::new(1).into(),
        ConstantDynamic::new(0, 11).into(),
        ConstantInvokeDynamic::new(1, 11).into(),
        ConstantModule::new(1).into(),
        ConstantPackage::new(1).into(),
    ]
}

#[test]
fn crafted_pool_decodes() {
    let data = object_pool_bytes();
    let pool = ConstantPool::parse(&data).unwrap();

    assert_eq!(pool.len(), 10);
    assert_eq!(pool.iter().count(), 9);

    let init = pool.get_as::<ConstantMethodref>(1).unwrap();
    assert_eq!(init.class_name(&pool).unwrap(), "java/lang/Object");
    assert_eq!(pool.describe(1).unwrap(), "java.lang.Object.<init> ()V");
    assert_eq!(pool.get_as::<ConstantLong>(7).unwrap().value(), 1);
    assert_eq!(
        pool.get_as::<ConstantString>(9).unwrap().resolve(&pool).unwrap(),
        "hi\0"
    );
    assert!(pool.validate().is_ok());
}

#[test]
fn crafted_pool_round_trips() {
    let data = object_pool_bytes();
    let pool = ConstantPool::parse(&data).unwrap();

    assert_eq!(pool.to_bytes().unwrap(), data);
    assert_eq!(pool.encoded_len(), data.len() - 2);

    let mut body = Vec::new();
    pool.dump(&mut body).unwrap();
    assert_eq!(body, data[2..]);
}

#[test]
fn every_kind_round_trips() {
    for constant in one_of_each() {
        let mut bytes = Vec::new();
        constant.dump(&mut bytes).unwrap();
        assert_eq!(bytes[0], constant.tag().value());
        assert_eq!(bytes.len(), constant.encoded_len());

        let mut parser = Parser::new(&bytes);
        let decoded = Constant::decode(&mut parser).unwrap();
        assert_eq!(decoded, constant, "{constant}");
        assert!(!parser.has_more_data());
    }
}

#[test]
fn tag_is_stable_under_mutation() {
    let mut pool = ConstantPool::new();
    let package = pool.insert(ConstantPackage::new(1)).unwrap();

    pool.get_as_mut::<ConstantPackage>(package)
        .unwrap()
        .set_name_index(u16::MAX);

    let constant = pool.get(package, ConstantTag::Package).unwrap();
    assert_eq!(constant.tag(), ConstantTag::Package);
    assert_eq!(
        constant.as_entry::<ConstantPackage>().unwrap().name_index(),
        u16::MAX
    );
}

#[test]
fn package_resolves_through_pool() {
    let mut pool = ConstantPool::new();
    pool.insert(ConstantInteger::new(0)).unwrap();
    let k = pool.insert(ConstantUtf8::new("foo").unwrap()).unwrap();
    let package = pool.insert(ConstantPackage::new(k)).unwrap();

    let record = pool.get_as::<ConstantPackage>(package).unwrap();
    assert_eq!(record.resolve(&pool).unwrap(), "foo");
    assert_eq!(
        pool.constant(package).unwrap().value(&pool).unwrap(),
        ConstantValue::Text("foo")
    );
}

#[test]
fn out_of_range_indices() {
    let pool = ConstantPool::parse(&object_pool_bytes()).unwrap();
    let size = u16::try_from(pool.len()).unwrap();

    for tag in [ConstantTag::Utf8, ConstantTag::Package, ConstantTag::Long] {
        assert!(matches!(
            pool.get(0, tag),
            Err(Error::IndexOutOfRange { index: 0, .. })
        ));
        assert!(matches!(
            pool.get(size + 1, tag),
            Err(Error::IndexOutOfRange { index: 11, size: 10 })
        ));
    }

    // Second slot of the Long
    assert!(matches!(
        pool.get(8, ConstantTag::Long),
        Err(Error::IndexOutOfRange { index: 8, .. })
    ));
}

#[test]
fn tag_mismatch_is_distinct_from_range() {
    let mut pool = ConstantPool::new();
    pool.insert(ConstantUtf8::new("foo").unwrap()).unwrap();
    let k = pool.insert(ConstantPackage::new(1)).unwrap();

    assert!(matches!(
        pool.get(k, ConstantTag::Utf8),
        Err(Error::TagMismatch {
            index: 2,
            expected: ConstantTag::Utf8,
            found: ConstantTag::Package,
        })
    ));
}

#[test]
fn truncated_record_is_not_inserted() {
    let mut pool = ConstantPool::new();
    pool.insert(ConstantUtf8::new("foo").unwrap()).unwrap();
    let before = pool.clone();

    // Package tag and one of its two index bytes
    let data = [0x14, 0x00];
    let mut parser = Parser::new(&data);
    let err = pool.decode(&mut parser, 1).unwrap_err();

    assert!(matches!(
        err.root_cause(),
        Error::TruncatedInput {
            needed: 2,
            remaining: 1,
            ..
        }
    ));
    assert_eq!(pool, before);
    assert_eq!(parser.pos(), 0);
}

#[test]
fn unknown_tag_keeps_prior_records() {
    let data = [
        0x01, 0x00, 0x01, b'a', // Utf8 "a"
        0x14, 0x00, 0x01, // Package #1
        0x0D, 0x00, 0x00, // tag 13 is unassigned
    ];
    let mut parser = Parser::new(&data);
    let mut pool = ConstantPool::new();
    let err = pool.decode(&mut parser, 3).unwrap_err();

    assert!(matches!(
        err,
        Error::Decode {
            slot: 3,
            offset: 7,
            ..
        }
    ));
    assert!(matches!(
        err.root_cause(),
        Error::UnknownTag { tag: 13, offset: 7 }
    ));
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.get_as::<ConstantPackage>(2).unwrap().resolve(&pool).unwrap(), "a");
}

#[test]
fn forward_and_self_references_decode() {
    let data = [
        0x00, 0x04, // three slots
        0x07, 0x00, 0x03, // Class -> #3, not yet decoded
        0x0C, 0x00, 0x02, 0x00, 0x02, // NameAndType pointing at itself
        0x01, 0x00, 0x01, b'A',
    ];
    let pool = ConstantPool::parse(&data).unwrap();

    assert_eq!(pool.describe(1).unwrap(), "A");
    let nat = pool.get_as::<ConstantNameAndType>(2).unwrap();
    assert!(matches!(
        nat.name(&pool),
        Err(Error::WrongReferencedTag {
            referrer: ConstantTag::NameAndType,
            index: 2,
            expected: ConstantTag::Utf8,
            found: ConstantTag::NameAndType,
        })
    ));

    // Resolution failures do not poison the pool
    assert_eq!(pool.describe(3).unwrap(), "A");
    assert_eq!(pool.to_bytes().unwrap(), data);
}

#[test]
fn wide_entry_overrunning_count_is_rejected() {
    // Declares two slots, then a Utf8 and a Double
    let data = [
        0x00, 0x03, 0x01, 0x00, 0x00, 0x06, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    let err = ConstantPool::parse(&data).unwrap_err();

    assert!(matches!(err, Error::Decode { slot: 2, offset: 5, .. }));
    assert!(matches!(err.root_cause(), Error::MalformedRecord { .. }));
}

#[test]
fn modified_utf8_payloads() {
    let mut pool = ConstantPool::new();
    let nul = pool.insert(ConstantUtf8::new("\0").unwrap()).unwrap();
    let emoji = pool.insert(ConstantUtf8::new("\u{1F600}").unwrap()).unwrap();

    let mut bytes = Vec::new();
    pool.dump(&mut bytes).unwrap();
    assert_eq!(
        bytes,
        [
            0x01, 0x00, 0x02, 0xC0, 0x80, // NUL
            0x01, 0x00, 0x06, 0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80, // surrogate pair
        ]
    );

    let mut parser = Parser::new(&bytes);
    let mut decoded = ConstantPool::new();
    decoded.decode(&mut parser, 2).unwrap();
    assert_eq!(decoded.get_as::<ConstantUtf8>(nul).unwrap().value().unwrap(), "\0");
    assert_eq!(
        decoded.get_as::<ConstantUtf8>(emoji).unwrap().value().unwrap(),
        "\u{1F600}"
    );
}

#[test]
fn lone_surrogate_decodes_and_fails_on_resolve() {
    // javac output for the literal "\uD800": Utf8 ED A0 80, String -> #1
    let data = [0x00, 0x03, 0x01, 0x00, 0x03, 0xED, 0xA0, 0x80, 0x08, 0x00, 0x01];
    let pool = ConstantPool::parse(&data).unwrap();

    assert_eq!(pool.to_bytes().unwrap(), data);
    assert_eq!(pool.get_as::<ConstantUtf8>(1).unwrap().bytes(), [0xED, 0xA0, 0x80]);
    assert!(matches!(
        pool.get_as::<ConstantString>(2).unwrap().resolve(&pool),
        Err(Error::MalformedRecord { .. })
    ));
    assert_eq!(pool.describe(1).unwrap(), "\u{FFFD}");

    let Err(Error::Invalid(failures)) = pool.validate() else {
        panic!("expected the String to fail validation");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, 2);
}

#[test]
fn non_canonical_utf8_round_trips_exactly() {
    let data = [
        0x00, 0x03, //
        0x01, 0x00, 0x02, 0xC1, 0x81, // overlong 'A'
        0x01, 0x00, 0x01, 0x00, // raw NUL
    ];
    let pool = ConstantPool::parse(&data).unwrap();

    assert_eq!(pool.get_as::<ConstantUtf8>(1).unwrap().value().unwrap(), "A");
    assert_eq!(pool.get_as::<ConstantUtf8>(2).unwrap().value().unwrap(), "\0");
    assert_eq!(pool.to_bytes().unwrap(), data);
    assert_eq!(pool.encoded_len(), data.len() - 2);
}

#[test]
fn builder_and_parsed_pool_agree() {
    let mut builder = PoolBuilder::new();
    let init = builder
        .methodref("java/lang/Object", "<init>", "()V")
        .unwrap();
    let built = builder.finish();

    let parsed = ConstantPool::parse(&object_pool_bytes()).unwrap();
    assert_eq!(built.describe(init).unwrap(), parsed.describe(1).unwrap());

    let mut extended = PoolBuilder::from_pool(parsed);
    assert_eq!(extended.methodref("java/lang/Object", "<init>", "()V").unwrap(), 1);
    assert_eq!(extended.string("hi\0").unwrap(), 9);
    assert_eq!(extended.long(1).unwrap(), 7);
    assert_eq!(extended.finish().len(), 10);
}

#[test]
fn visitor_sees_records_in_order() {
    struct Names<'p> {
        pool: &'p ConstantPool,
        seen: Vec<String>,
    }

    impl ConstantVisitor for Names<'_> {
        fn visit_utf8(&mut self, c: &ConstantUtf8) {
            self.seen.push(format!("utf8:{}", c.to_string_lossy()));
        }
        fn visit_integer(&mut self, _: &ConstantInteger) {}
        fn visit_float(&mut self, _: &ConstantFloat) {}
        fn visit_long(&mut self, c: &ConstantLong) {
            self.seen.push(format!("long:{}", c.value()));
        }
        fn visit_double(&mut self, _: &ConstantDouble) {}
        fn visit_class(&mut self, c: &ConstantClass) {
            self.seen.push(format!("class:{}", c.resolve(self.pool).unwrap()));
        }
        fn visit_string(&mut self, _: &ConstantString) {
            self.seen.push("string".to_string());
        }
        fn visit_fieldref(&mut self, _: &ConstantFieldref) {}
        fn visit_methodref(&mut self, c: &ConstantMethodref) {
            self.seen.push(format!("method:{}", c.class_name(self.pool).unwrap()));
        }
        fn visit_interface_methodref(&mut self, _: &ConstantInterfaceMethodref) {}
        fn visit_name_and_type(&mut self, c: &ConstantNameAndType) {
            self.seen.push(format!("nat:{}", c.name(self.pool).unwrap()));
        }
        fn visit_method_handle(&mut self, _: &ConstantMethodHandle) {}
        fn visit_method_type(&mut self, _: &ConstantMethodType) {}
        fn visit_dynamic(&mut self, _: &ConstantDynamic) {}
        fn visit_invoke_dynamic(&mut self, _: &ConstantInvokeDynamic) {}
        fn visit_module(&mut self, _: &ConstantModule) {}
        fn visit_package(&mut self, _: &ConstantPackage) {}
    }

    let pool = ConstantPool::parse(&object_pool_bytes()).unwrap();
    let mut names = Names {
        pool: &pool,
        seen: Vec::new(),
    };
    pool.accept(&mut names);

    assert_eq!(
        names.seen,
        [
            "method:java/lang/Object",
            "class:java/lang/Object",
            "nat:<init>",
            "utf8:java/lang/Object",
            "utf8:<init>",
            "utf8:()V",
            "long:1",
            "string",
            "utf8:hi\0",
        ]
    );
}

#[test]
fn pool_is_shareable_across_threads() {
    let pool = ConstantPool::parse(&object_pool_bytes()).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| pool.describe(1).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "java.lang.Object.<init> ()V");
        }
    });
}

fn any_constant() -> impl Strategy<Value = Constant> {
    prop_oneof![
        ".{0,64}".prop_map(|text: String| Constant::from(ConstantUtf8::new(text).unwrap())),
        prop::collection::vec(any::<u8>(), 0..64)
            .prop_map(|bytes| Constant::from(ConstantUtf8::from_bytes(bytes).unwrap())),
        any::<i32>().prop_map(|v| Constant::from(ConstantInteger::new(v))),
        any::<u32>().prop_map(|bits| Constant::from(ConstantFloat::new(f32::from_bits(bits)))),
        any::<i64>().prop_map(|v| Constant::from(ConstantLong::new(v))),
        any::<u64>().prop_map(|bits| Constant::from(ConstantDouble::new(f64::from_bits(bits)))),
        any::<u16>().prop_map(|i| Constant::from(ConstantClass::new(i))),
        any::<u16>().prop_map(|i| Constant::from(ConstantString::new(i))),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Constant::from(ConstantFieldref::new(a, b))),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Constant::from(ConstantMethodref::new(a, b))),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Constant::from(ConstantInterfaceMethodref::new(a, b))),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Constant::from(ConstantNameAndType::new(a, b))),
        (1u8..=9, any::<u16>()).prop_map(|(kind, i)| {
            Constant::from(ConstantMethodHandle::from_raw(kind, i).unwrap())
        }),
        any::<u16>().prop_map(|i| Constant::from(ConstantMethodType::new(i))),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Constant::from(ConstantDynamic::new(a, b))),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Constant::from(ConstantInvokeDynamic::new(a, b))),
        any::<u16>().prop_map(|i| Constant::from(ConstantModule::new(i))),
        any::<u16>().prop_map(|i| Constant::from(ConstantPackage::new(i))),
    ]
}

proptest! {
    #[test]
    fn record_decode_inverts_dump(constant in any_constant()) {
        let mut bytes = Vec::new();
        constant.dump(&mut bytes).unwrap();
        prop_assert_eq!(bytes.len(), constant.encoded_len());

        let mut parser = Parser::new(&bytes);
        let decoded = Constant::decode(&mut parser).unwrap();
        prop_assert_eq!(decoded.tag(), constant.tag());
        prop_assert_eq!(decoded, constant);
    }

    #[test]
    fn pool_parse_inverts_write(constants in prop::collection::vec(any_constant(), 0..64)) {
        let mut pool = ConstantPool::new();
        for constant in constants {
            pool.insert(constant).unwrap();
        }

        let bytes = pool.to_bytes().unwrap();
        let parsed = ConstantPool::parse(&bytes).unwrap();
        prop_assert_eq!(parsed.to_bytes().unwrap(), bytes);
        prop_assert_eq!(parsed, pool);
    }

    #[test]
    fn arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut parser = Parser::new(&data);
        if let Ok(pool) = ConstantPool::read(&mut parser, &PoolConfig::default()) {
            prop_assert_eq!(pool.to_bytes().unwrap(), &data[..parser.pos()]);
            for (index, _) in pool.iter() {
                let _ = pool.describe(index);
            }
            let _ = pool.validate();
        }
    }
}
