//! Short public codes identifying commissions and surveys in voting links.

use rand::{rngs::ThreadRng, Rng};

use crate::error::{Error, Result};
use crate::model::storage::{Entity, Filter, Store};

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const COMMISSION_CODE_LEN: usize = 8;
const SURVEY_PREFIX: &str = "SURV";
const SURVEY_CODE_LEN: usize = 6;
const MAX_ATTEMPTS: usize = 16;

fn random_code(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

pub fn commission_code(rng: &mut impl Rng) -> String {
    random_code(rng, COMMISSION_CODE_LEN)
}

pub fn survey_code(rng: &mut impl Rng) -> String {
    format!("{SURVEY_PREFIX}{}", random_code(rng, SURVEY_CODE_LEN))
}

/// Generate codes until one is not yet used by any `T`.
pub async fn unique<T: Entity>(store: &Store, generate: fn(&mut ThreadRng) -> String) -> Result<String> {
    for _ in 0..MAX_ATTEMPTS {
        let code = generate(&mut rand::thread_rng());
        let taken = store
            .find_one::<T>(&Filter::new().eq("link_code", code.as_str()))
            .await?
            .is_some();
        if !taken {
            return Ok(code);
        }
        debug!("Link code {code} already taken, regenerating");
    }
    Err(Error::Storage(format!(
        "could not find a free link code for {} after {MAX_ATTEMPTS} attempts",
        T::LABEL
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_shapes() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let code = commission_code(&mut rng);
            assert_eq!(code.len(), 8);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));

            let code = survey_code(&mut rng);
            assert_eq!(code.len(), 10);
            assert!(code.starts_with("SURV"));
        }
    }
}
