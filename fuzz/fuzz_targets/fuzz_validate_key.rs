#![no_main]

use std::sync::OnceLock;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use keyreg::{
    compliance::ComplianceMode,
    key::{Key, KeyFormat},
    primitives::PrimitiveKind,
    registry::Registry,
    secret_access::SecretKeyAccess,
    secure_memory::SecretBytes,
    templates,
};

#[derive(Arbitrary, Debug)]
struct ValidateKeyFuzzInput {
    template: u8,
    version: u32,
    secret: Vec<u8>,
    public: Vec<u8>,
    randomness: Vec<u8>,
    kind: u8,
}

const KINDS: [PrimitiveKind; 6] = [
    PrimitiveKind::Aead,
    PrimitiveKind::DeterministicAead,
    PrimitiveKind::HybridEncrypt,
    PrimitiveKind::HybridDecrypt,
    PrimitiveKind::PublicKeySign,
    PrimitiveKind::PublicKeyVerify,
];

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let registry = Registry::with_compliance_mode(ComplianceMode::Unrestricted);
        keyreg::init_with(&registry).unwrap();
        registry
    })
}

fuzz_target!(|input: ValidateKeyFuzzInput| {
    let registry = registry();
    let names = templates::TEMPLATE_NAMES;
    let template = templates::get(names[input.template as usize % names.len()]).unwrap();
    let kind = KINDS[input.kind as usize % KINDS.len()];

    // Derivation consumes arbitrary streams without panicking
    let _ = registry.derive_key(
        &template.type_url,
        &KeyFormat::new().with_version(input.version % 2),
        &mut input.randomness.as_slice(),
    );

    // Mutated keys either fail validation or build a primitive
    let key = registry.new_key_data_from_template(&template).unwrap();
    let access = SecretKeyAccess::get();
    let mut mutated = key
        .with_version(input.version % 2)
        .with_secret_value(SecretBytes::new(&input.secret, access));
    if let Some(public_key) = mutated.public_key().cloned() {
        mutated = mutated.with_public_key(public_key.with_public_value(input.public));
    }

    if registry.validate_key(&mutated).is_ok() {
        let _ = registry.primitive(&mutated, kind);
    }
});
