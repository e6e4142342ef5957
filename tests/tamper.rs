//! Soundness: any perturbation of a proof's value, salt, sibling digests,
//! path, or structure must make verification fail, and undecodable inputs
//! must be rejected as malformed rather than silently refused.

use schema_merkle::schema::{ClassDecl, PrimitiveType, Property, SchemaRegistry};
use schema_merkle::{proof, root, salt, verify, EngineError, Proof, Record, SiblingHashes, Value};

fn fixture() -> (SchemaRegistry, Record) {
    let mut builder = SchemaRegistry::builder();
    builder.declare(ClassDecl::new(
        "org.acme.Account",
        vec![
            Property::primitive("iban", PrimitiveType::String),
            Property::primitive("balance", PrimitiveType::Long),
        ],
    ));
    builder.declare(ClassDecl::new(
        "org.acme.Customer",
        vec![
            Property::primitive("name", PrimitiveType::String),
            Property::nested("account", "org.acme.Account"),
            Property::primitive("active", PrimitiveType::Boolean),
        ],
    ));
    let registry = builder.finish().unwrap();

    let mut account = Record::new("org.acme.Account");
    account.set("iban", "DE02120300000000202051");
    account.set("balance", 1_250_000i64);

    let mut customer = Record::new("org.acme.Customer");
    customer.set("name", "Grace");
    customer.set("account", account);
    customer.set("active", true);

    (registry, customer)
}

fn flip_hex_byte(hex_text: &str) -> String {
    let mut bytes = hex::decode(hex_text).unwrap();
    bytes[0] ^= 0x01;
    hex::encode(bytes)
}

fn verified(registry: &SchemaRegistry, path: &[&str], root_hex: &str, proof: &Proof) -> bool {
    verify(registry, "org.acme.Customer", path, root_hex, proof).unwrap()
}

#[test]
fn value_tamper_fails() {
    let (registry, mut record) = fixture();
    salt(&registry, &mut record).unwrap();
    let root_hex = root(&registry, &record).unwrap();

    let mut disclosure = proof(&registry, &record, &["name"]).unwrap();
    assert!(verified(&registry, &["name"], &root_hex, &disclosure));
    disclosure.value = Value::String("Grace ".into());
    assert!(!verified(&registry, &["name"], &root_hex, &disclosure));

    let mut disclosure = proof(&registry, &record, &["account", "balance"]).unwrap();
    disclosure.value = Value::Long(1_250_001);
    assert!(!verified(&registry, &["account", "balance"], &root_hex, &disclosure));

    // A disclosed value of the wrong runtime shape cannot verify either.
    let mut disclosure = proof(&registry, &record, &["active"]).unwrap();
    disclosure.value = Value::String("true".into());
    assert!(!verified(&registry, &["active"], &root_hex, &disclosure));
}

#[test]
fn salt_tamper_fails() {
    let (registry, mut record) = fixture();
    salt(&registry, &mut record).unwrap();
    let root_hex = root(&registry, &record).unwrap();

    let mut disclosure = proof(&registry, &record, &["account", "iban"]).unwrap();
    disclosure.salt = flip_hex_byte(&disclosure.salt);
    assert!(!verified(&registry, &["account", "iban"], &root_hex, &disclosure));
}

#[test]
fn every_sibling_digest_is_load_bearing() {
    let (registry, mut record) = fixture();
    salt(&registry, &mut record).unwrap();
    let root_hex = root(&registry, &record).unwrap();
    let disclosure = proof(&registry, &record, &["account", "iban"]).unwrap();
    assert!(verified(&registry, &["account", "iban"], &root_hex, &disclosure));

    for level in 0..disclosure.hashes.len() {
        for index in 0..disclosure.hashes[level].before.len() {
            let mut tampered = disclosure.clone();
            tampered.hashes[level].before[index] =
                flip_hex_byte(&tampered.hashes[level].before[index]);
            assert!(
                !verified(&registry, &["account", "iban"], &root_hex, &tampered),
                "tampered before[{index}] at level {level} still verified"
            );
        }
        for index in 0..disclosure.hashes[level].after.len() {
            let mut tampered = disclosure.clone();
            tampered.hashes[level].after[index] =
                flip_hex_byte(&tampered.hashes[level].after[index]);
            assert!(
                !verified(&registry, &["account", "iban"], &root_hex, &tampered),
                "tampered after[{index}] at level {level} still verified"
            );
        }
    }
}

#[test]
fn proof_for_one_path_rejected_for_another() {
    let (registry, mut record) = fixture();
    salt(&registry, &mut record).unwrap();
    let root_hex = root(&registry, &record).unwrap();

    // Sibling confusion inside one class.
    let disclosure = proof(&registry, &record, &["account", "iban"]).unwrap();
    assert!(!verified(&registry, &["account", "balance"], &root_hex, &disclosure));

    // Confusion across levels.
    let disclosure = proof(&registry, &record, &["name"]).unwrap();
    assert!(!verified(&registry, &["account", "iban"], &root_hex, &disclosure));
    assert!(!verified(&registry, &["active"], &root_hex, &disclosure));

    // A path that resolves nowhere in the declaration.
    assert!(!verified(&registry, &["nickname"], &root_hex, &disclosure));
    assert!(!verified(&registry, &[], &root_hex, &disclosure));
}

#[test]
fn swapped_sibling_lists_fail() {
    let (registry, mut record) = fixture();
    salt(&registry, &mut record).unwrap();
    let root_hex = root(&registry, &record).unwrap();

    let disclosure = proof(&registry, &record, &["account", "iban"]).unwrap();
    let mut swapped = disclosure.clone();
    for level in &mut swapped.hashes {
        std::mem::swap(&mut level.before, &mut level.after);
    }
    assert!(!verified(&registry, &["account", "iban"], &root_hex, &swapped));
}

#[test]
fn hashes_shortfall_and_surplus_fail() {
    let (registry, mut record) = fixture();
    salt(&registry, &mut record).unwrap();
    let root_hex = root(&registry, &record).unwrap();
    let disclosure = proof(&registry, &record, &["account", "iban"]).unwrap();

    let mut truncated = disclosure.clone();
    truncated.hashes.pop();
    assert!(!verified(&registry, &["account", "iban"], &root_hex, &truncated));

    let mut beheaded = disclosure.clone();
    beheaded.hashes.remove(0);
    assert!(!verified(&registry, &["account", "iban"], &root_hex, &beheaded));

    let mut padded = disclosure.clone();
    padded.hashes.push(SiblingHashes {
        before: vec![],
        after: vec![],
    });
    assert!(!verified(&registry, &["account", "iban"], &root_hex, &padded));
}

#[test]
fn wrong_length_digest_is_a_plain_failure() {
    let (registry, mut record) = fixture();
    salt(&registry, &mut record).unwrap();
    let root_hex = root(&registry, &record).unwrap();
    let mut disclosure = proof(&registry, &record, &["account", "iban"]).unwrap();
    disclosure.hashes[0].after[0].truncate(32);
    assert!(!verified(&registry, &["account", "iban"], &root_hex, &disclosure));
}

#[test]
fn undecodable_inputs_are_malformed() {
    let (registry, mut record) = fixture();
    salt(&registry, &mut record).unwrap();
    let root_hex = root(&registry, &record).unwrap();
    let disclosure = proof(&registry, &record, &["account", "iban"]).unwrap();

    let mut bad_digest = disclosure.clone();
    bad_digest.hashes[0].after[0] = "z".repeat(64);
    assert!(matches!(
        verify(&registry, "org.acme.Customer", &["account", "iban"], &root_hex, &bad_digest),
        Err(EngineError::MalformedProof { .. })
    ));

    let mut bad_salt = disclosure.clone();
    bad_salt.salt = "not hex".into();
    assert!(matches!(
        verify(&registry, "org.acme.Customer", &["account", "iban"], &root_hex, &bad_salt),
        Err(EngineError::MalformedProof { .. })
    ));

    let mut short_salt = disclosure.clone();
    short_salt.salt = "00".repeat(31);
    assert!(matches!(
        verify(&registry, "org.acme.Customer", &["account", "iban"], &root_hex, &short_salt),
        Err(EngineError::MalformedProof { .. })
    ));

    assert!(matches!(
        verify(&registry, "org.acme.Customer", &["account", "iban"], "xyz", &disclosure),
        Err(EngineError::MalformedProof { .. })
    ));
}

#[test]
fn wrong_root_fails_cleanly() {
    let (registry, mut record) = fixture();
    salt(&registry, &mut record).unwrap();
    let root_hex = root(&registry, &record).unwrap();
    let disclosure = proof(&registry, &record, &["name"]).unwrap();

    let other_root = flip_hex_byte(&root_hex);
    assert!(!verified(&registry, &["name"], &other_root, &disclosure));
}

#[test]
fn unknown_class_is_a_contract_error() {
    let (registry, mut record) = fixture();
    salt(&registry, &mut record).unwrap();
    let root_hex = root(&registry, &record).unwrap();
    let disclosure = proof(&registry, &record, &["name"]).unwrap();

    assert!(matches!(
        verify(&registry, "org.acme.Stranger", &["name"], &root_hex, &disclosure),
        Err(EngineError::UnknownClass { .. })
    ));
}
