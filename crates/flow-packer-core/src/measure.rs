//! Measurement providers: turn values (labels, images, ...) into natural sizes before packing.

use crate::model::{Item, Size};
use serde::{Deserialize, Serialize};

/// Supplies the natural size of a value.
pub trait Measure<T: ?Sized> {
    fn measure(&self, value: &T) -> Size;
}

impl<T: ?Sized, F> Measure<T> for F
where
    F: Fn(&T) -> Size,
{
    fn measure(&self, value: &T) -> Size {
        self(value)
    }
}

/// Fixed-advance estimate of a rounded text chip (tag label).
///
/// Width is `chars * char_width + 2 * padding.0`, height is `line_height + 2 * padding.1`.
/// Characters are Unicode scalar values; there is no shaping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChipMetrics {
    pub char_width: f64,
    pub line_height: f64,
    /// Horizontal and vertical inner padding.
    pub padding: (f64, f64),
}

impl Default for ChipMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.5,
            line_height: 16.0,
            padding: (8.0, 4.0),
        }
    }
}

impl Measure<str> for ChipMetrics {
    fn measure(&self, label: &str) -> Size {
        let chars = label.chars().count() as f64;
        Size::new(
            chars * self.char_width + 2.0 * self.padding.0,
            self.line_height + 2.0 * self.padding.1,
        )
    }
}

impl Measure<String> for ChipMetrics {
    fn measure(&self, label: &String) -> Size {
        <Self as Measure<str>>::measure(self, label.as_str())
    }
}

/// Measures every value and keys the resulting item by the value itself.
pub fn measure_items<T, M>(values: &[T], metrics: &M) -> Vec<Item<T>>
where
    T: Clone,
    M: Measure<T> + ?Sized,
{
    values
        .iter()
        .map(|v| Item {
            key: v.clone(),
            size: metrics.measure(v),
        })
        .collect()
}

/// Tag labels of the recipe catalog; a ready-made chip set for demos and benchmarks.
pub const RECIPE_CATEGORIES: [&str; 14] = [
    "Breakfast",
    "Lunch",
    "Dinner",
    "Appetizer",
    "Salad",
    "Main Dish",
    "Side Dish",
    "Baked Goods",
    "Dessert",
    "Snack",
    "Soup",
    "Holiday",
    "Vegetarian",
    "Vegan",
];
