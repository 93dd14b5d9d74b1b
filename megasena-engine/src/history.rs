use megasena_db::models::{validate_draw, Draw, PICK_COUNT};

use crate::error::{EngineError, EngineResult};

/// Historique immuable des tirages, du plus ancien au plus récent.
///
/// Les numéros sont stockés en base zéro (0-59) et triés.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStore {
    draws: Vec<[u8; PICK_COUNT]>,
}

impl HistoryStore {
    /// `draws` doit être dans l'ordre chronologique et déjà validé par le chargeur.
    pub fn from_draws(draws: &[Draw]) -> EngineResult<Self> {
        if draws.is_empty() {
            return Err(EngineError::EmptyHistory);
        }
        let draws = draws
            .iter()
            .map(|d| {
                validate_draw(&d.numbers)
                    .map_err(|e| EngineError::InvalidCandidate(format!("tirage {} : {}", d.contest, e)))?;
                let mut zero_based = d.numbers.map(|n| n - 1);
                zero_based.sort();
                Ok(zero_based)
            })
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(Self { draws })
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn draws(&self) -> &[[u8; PICK_COUNT]] {
        &self.draws
    }

    /// Les `window` derniers tirages (ou tout l'historique s'il est plus court).
    pub fn last(&self, window: usize) -> &[[u8; PICK_COUNT]] {
        let start = self.draws.len().saturating_sub(window);
        &self.draws[start..]
    }

    /// Index du premier tirage de la fenêtre récente.
    pub fn window_start(&self, window: usize) -> usize {
        self.draws.len().saturating_sub(window)
    }
}

#[cfg(test)]
pub(crate) fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = (i % 9) as u8;
            let shift = (i / 9 % 3) as u8;
            Draw {
                contest: i as u32 + 1,
                date: format!("2024-01-{:02}", (i % 28) + 1),
                numbers: [
                    base * 6 + 1,
                    base * 6 + 3 + shift,
                    base * 6 + 6,
                    (base * 6 + 13) % 60 + 1,
                    (base * 6 + 29) % 60 + 1,
                    (base * 6 + 47) % 60 + 1,
                ],
            }
        })
        .collect()
}
