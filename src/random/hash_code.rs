use rand::distributions::Alphanumeric;
use rand::Rng;

/// Random code of `len` characters from `[A-Za-z0-9]`.
pub fn gen_hash_code(len: usize) -> String {
    gen_hash_code_with(&mut rand::thread_rng(), len)
}

pub fn gen_hash_code_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}
