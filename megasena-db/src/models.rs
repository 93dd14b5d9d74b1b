use anyhow::{bail, Result};

/// Nombre de numéros dans la grille (1-60).
pub const POOL_SIZE: usize = 60;

/// Nombre de numéros tirés à chaque concours.
pub const PICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub contest: u32,
    pub date: String,
    /// Numéros 1-60, triés par ordre croissant.
    pub numbers: [u8; PICK_COUNT],
}

impl Draw {
    pub fn new(contest: u32, date: impl Into<String>, mut numbers: [u8; PICK_COUNT]) -> Result<Self> {
        validate_draw(&numbers)?;
        numbers.sort();
        Ok(Self {
            contest,
            date: date.into(),
            numbers,
        })
    }

    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| n as u32).sum()
    }
}

pub fn validate_draw(numbers: &[u8; PICK_COUNT]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n as usize > POOL_SIZE {
            bail!("Numéro {} hors limites (1-{})", n, POOL_SIZE);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}
