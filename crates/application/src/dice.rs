//! Dice port and implementations.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use rand::Rng;

/// Source of dice rolls.
pub trait Dice: Send + Sync {
    /// Rolls `num_dice` dice with `sides` sides and adds `modifier`.
    ///
    /// `roll(3, 6, 2)` is a 3d6+2 roll.
    fn roll(&self, num_dice: u32, sides: u32, modifier: i32) -> i32;
}

impl<D: Dice + ?Sized> Dice for Arc<D> {
    fn roll(&self, num_dice: u32, sides: u32, modifier: i32) -> i32 {
        (**self).roll(num_dice, sides, modifier)
    }
}

/// Dice backed by the thread-local random number generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDice;

impl Dice for RandomDice {
    fn roll(&self, num_dice: u32, sides: u32, modifier: i32) -> i32 {
        let mut rng = rand::rng();
        let total: u32 = (0..num_dice)
            .map(|_| rng.random_range(1..=sides.max(1)))
            .sum();
        total as i32 + modifier
    }
}

/// Dice returning scripted values, for tests.
///
/// Each die takes the next scripted value; an exhausted script yields 1.
#[derive(Debug, Clone, Default)]
pub struct LoadedDice {
    values: Arc<Mutex<VecDeque<u32>>>,
}

impl LoadedDice {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: Arc::new(Mutex::new(values.into_iter().collect())),
        }
    }

    /// Returns the number of scripted values not yet rolled.
    pub fn remaining(&self) -> usize {
        self.values.lock().map_or(0, |values| values.len())
    }
}

impl Dice for LoadedDice {
    fn roll(&self, num_dice: u32, _sides: u32, modifier: i32) -> i32 {
        let total: u32 = match self.values.lock() {
            Ok(mut values) => (0..num_dice).map(|_| values.pop_front().unwrap_or(1)).sum(),
            Err(_) => num_dice,
        };
        total as i32 + modifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_dice_stay_in_range() {
        let dice = RandomDice;
        for _ in 0..200 {
            let roll = dice.roll(3, 6, 2);
            assert!((5..=20).contains(&roll), "3d6+2 rolled {roll}");
        }
    }

    #[test]
    fn single_d10() {
        let dice = RandomDice;
        for _ in 0..200 {
            assert!((1..=10).contains(&dice.roll(1, 10, 0)));
        }
    }

    #[test]
    fn loaded_dice_follow_the_script() {
        let dice = LoadedDice::new([4, 2, 6]);

        assert_eq!(dice.roll(2, 6, 1), 7);
        assert_eq!(dice.remaining(), 1);
        assert_eq!(dice.roll(1, 6, 0), 6);
        assert_eq!(dice.roll(1, 6, 0), 1);
    }
}
