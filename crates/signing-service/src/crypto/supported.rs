use super::{EccGenerator, KeyPairGenerator, RsaGenerator};

static SUPPORTED_KEY_PAIR_GENERATORS: [&(dyn KeyPairGenerator); 2] = [&EccGenerator, &RsaGenerator];

/// All generators the service can create devices with.
pub fn supported_key_pair_generators() -> &'static [&'static dyn KeyPairGenerator] {
    &SUPPORTED_KEY_PAIR_GENERATORS
}

/// Look up a generator by its exact algorithm name ("RSA" or "ECC").
pub fn find_key_pair_generator(name: &str) -> Option<&'static dyn KeyPairGenerator> {
    SUPPORTED_KEY_PAIR_GENERATORS
        .iter()
        .copied()
        .find(|generator| generator.algorithm_name() == name)
}
