use std::fmt;

use megasena_db::models::POOL_SIZE;

use crate::error::{EngineError, EngineResult};

pub const MIN_CANDIDATE_SIZE: usize = 6;
pub const MAX_CANDIDATE_SIZE: usize = 12;

/// Grille de k numéros distincts (1-60), triés par ordre croissant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    numbers: Vec<u8>,
}

impl CandidateSet {
    pub fn new(mut numbers: Vec<u8>) -> EngineResult<Self> {
        check_shape(&numbers)?;
        numbers.sort();
        if let Some(w) = numbers.windows(2).find(|w| w[0] == w[1]) {
            return Err(EngineError::InvalidCandidate(format!("numéro en double : {}", w[0])));
        }
        Ok(Self { numbers })
    }

    /// Pour le générateur, qui garantit déjà l'unicité et les bornes.
    pub(crate) fn from_sorted(numbers: Vec<u8>) -> Self {
        debug_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        Self { numbers }
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

impl fmt::Display for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.numbers.iter().map(|n| format!("{:02}", n)).collect();
        write!(f, "{}", parts.join(" - "))
    }
}

pub fn check_count(count: usize) -> EngineResult<()> {
    if !(MIN_CANDIDATE_SIZE..=MAX_CANDIDATE_SIZE).contains(&count) {
        return Err(EngineError::InvalidCount {
            count,
            min: MIN_CANDIDATE_SIZE,
            max: MAX_CANDIDATE_SIZE,
        });
    }
    Ok(())
}

/// Taille et bornes, sans vérifier les doublons.
pub(crate) fn check_shape(numbers: &[u8]) -> EngineResult<()> {
    if !(MIN_CANDIDATE_SIZE..=MAX_CANDIDATE_SIZE).contains(&numbers.len()) {
        return Err(EngineError::InvalidCandidate(format!(
            "{} numéros (attendu {}-{})",
            numbers.len(),
            MIN_CANDIDATE_SIZE,
            MAX_CANDIDATE_SIZE
        )));
    }
    if let Some(&n) = numbers.iter().find(|&&n| n < 1 || n as usize > POOL_SIZE) {
        return Err(EngineError::InvalidCandidate(format!("numéro {} hors limites (1-{})", n, POOL_SIZE)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts() {
        let c = CandidateSet::new(vec![60, 1, 33, 12, 7, 45]).unwrap();
        assert_eq!(c.numbers(), &[1, 7, 12, 33, 45, 60]);
        assert_eq!(c.to_string(), "01 - 07 - 12 - 33 - 45 - 60");
    }

    #[test]
    fn test_new_rejects_duplicates() {
        assert!(matches!(
            CandidateSet::new(vec![1, 1, 3, 4, 5, 6]),
            Err(EngineError::InvalidCandidate(_))
        ));
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(CandidateSet::new(vec![0, 2, 3, 4, 5, 6]).is_err());
        assert!(CandidateSet::new(vec![1, 2, 3, 4, 5, 61]).is_err());
    }

    #[test]
    fn test_new_rejects_bad_length() {
        assert!(CandidateSet::new(vec![1, 2, 3, 4, 5]).is_err());
        assert!(CandidateSet::new((1..=13).collect()).is_err());
        assert!(CandidateSet::new((1..=12).collect()).is_ok());
    }

    #[test]
    fn test_check_count_bounds() {
        assert!(check_count(6).is_ok());
        assert!(check_count(12).is_ok());
        assert_eq!(check_count(5), Err(EngineError::InvalidCount { count: 5, min: 6, max: 12 }));
        assert!(check_count(13).is_err());
    }
}
