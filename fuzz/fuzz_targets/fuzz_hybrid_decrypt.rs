#![no_main]

use std::sync::{Arc, OnceLock};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use keyreg::{
    compliance::ComplianceMode,
    primitives::{HybridDecrypt, HybridEncrypt, PrimitiveKind},
    registry::Registry,
    templates,
};

#[derive(Arbitrary, Debug)]
struct HybridFuzzInput {
    plaintext: Vec<u8>,
    context_info: Vec<u8>,
    ciphertext: Vec<u8>,
}

type Pair = (Arc<dyn HybridEncrypt>, Arc<dyn HybridDecrypt>);

fn pair() -> &'static Pair {
    static PAIR: OnceLock<Pair> = OnceLock::new();
    PAIR.get_or_init(|| {
        let registry = Registry::with_compliance_mode(ComplianceMode::Unrestricted);
        keyreg::init_with(&registry).unwrap();
        let template = templates::get("X25519_HKDF_SHA256_AES256_GCM").unwrap();
        let private_key = registry.new_key_data_from_template(&template).unwrap();
        let public_key = registry.public_key_data(&private_key).unwrap();
        let encrypter = registry
            .primitive(&public_key, PrimitiveKind::HybridEncrypt)
            .unwrap()
            .into_hybrid_encrypt()
            .unwrap();
        let decrypter = registry
            .primitive(&private_key, PrimitiveKind::HybridDecrypt)
            .unwrap()
            .into_hybrid_decrypt()
            .unwrap();
        (encrypter, decrypter)
    })
}

fuzz_target!(|input: HybridFuzzInput| {
    let (encrypter, decrypter) = pair();

    let _ = decrypter.decrypt(&input.ciphertext, &input.context_info);

    let ciphertext = encrypter
        .encrypt(&input.plaintext, &input.context_info)
        .unwrap();
    assert_eq!(
        decrypter.decrypt(&ciphertext, &input.context_info).unwrap(),
        input.plaintext
    );
});
