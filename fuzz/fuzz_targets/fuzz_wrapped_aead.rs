#![no_main]

use std::sync::{Arc, OnceLock};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use keyreg::{
    aead::AES_GCM_TYPE_URL,
    key::{KeyFormat, OutputPrefixType},
    primitive_set::PrimitiveSet,
    primitives::{Aead, PrimitiveKind},
    registry,
};

#[derive(Arbitrary, Debug)]
struct WrappedAeadFuzzInput {
    plaintext: Vec<u8>,
    associated_data: Vec<u8>,
    ciphertext: Vec<u8>,
    flip: Option<(u16, u8)>,
}

// One Tink-prefixed primary plus one raw key
fn aead() -> &'static Arc<dyn Aead> {
    static AEAD: OnceLock<Arc<dyn Aead>> = OnceLock::new();
    AEAD.get_or_init(|| {
        keyreg::init().unwrap();
        let registry = registry::global();
        let mut set = PrimitiveSet::new(PrimitiveKind::Aead);
        for (key_id, prefix) in [(7u32, OutputPrefixType::Raw), (42, OutputPrefixType::Tink)] {
            let key = registry
                .new_key_data(AES_GCM_TYPE_URL, &KeyFormat::new())
                .unwrap();
            let entry = registry
                .primitive_entry(&key, PrimitiveKind::Aead, key_id, prefix)
                .unwrap();
            if prefix == OutputPrefixType::Tink {
                set.add_primary(entry).unwrap();
            } else {
                set.add(entry).unwrap();
            }
        }
        registry.wrap(set).unwrap().into_aead().unwrap()
    })
}

fuzz_target!(|input: WrappedAeadFuzzInput| {
    let aead = aead();

    // Arbitrary ciphertexts must fail cleanly
    let _ = aead.decrypt(&input.ciphertext, &input.associated_data);

    let mut ciphertext = aead
        .encrypt(&input.plaintext, &input.associated_data)
        .unwrap();
    assert_eq!(
        aead.decrypt(&ciphertext, &input.associated_data).unwrap(),
        input.plaintext
    );

    if let Some((position, mask)) = input.flip.filter(|&(_, mask)| mask != 0) {
        let position = position as usize % ciphertext.len();
        ciphertext[position] ^= mask;
        assert!(aead.decrypt(&ciphertext, &input.associated_data).is_err());
    }
});
