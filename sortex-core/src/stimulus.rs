use serde::Serialize;

/// Number of trials in one play-through.
pub const TOTAL_TRIALS: usize = 8;

const _: () = assert!(TOTAL_TRIALS % 2 == 0, "context split needs an even trial count");

/// Something that can be shown to the participant and sorted into a bucket
pub trait Stimulus: Clone + Send + Sync + std::fmt::Debug {
    fn category(&self) -> Category;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Animal,
    Shape,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Animal => "Animals",
            Category::Shape => "Shapes",
        }
    }
}

/// Immutable catalog entry. Category is intrinsic to the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StimulusItem {
    pub symbol: &'static str,
    pub name: &'static str,
    pub category: Category,
}

impl StimulusItem {
    pub const fn animal(symbol: &'static str, name: &'static str) -> Self {
        Self {
            symbol,
            name,
            category: Category::Animal,
        }
    }

    pub const fn shape(symbol: &'static str, name: &'static str) -> Self {
        Self {
            symbol,
            name,
            category: Category::Shape,
        }
    }

    pub fn is_animal(&self) -> bool {
        matches!(self.category, Category::Animal)
    }
}

impl Stimulus for StimulusItem {
    fn category(&self) -> Category {
        self.category
    }
}

/// Fixed presentation order, animals and shapes interleaved.
pub const CATALOG: [StimulusItem; TOTAL_TRIALS] = [
    StimulusItem::animal("🐶", "dog"),
    StimulusItem::shape("⭕", "circle"),
    StimulusItem::animal("🐱", "cat"),
    StimulusItem::shape("⬛", "square"),
    StimulusItem::animal("🐰", "rabbit"),
    StimulusItem::shape("△", "triangle"),
    StimulusItem::animal("🐨", "koala"),
    StimulusItem::shape("⬟", "pentagon"),
];

/// Catalog entry presented at `trial_index`, if that trial exists
pub fn catalog_item(trial_index: usize) -> Option<&'static StimulusItem> {
    CATALOG.get(trial_index)
}

/// Catalog entries of one category, in presentation order
pub fn items_in(category: Category) -> impl Iterator<Item = &'static StimulusItem> {
    CATALOG.iter().filter(move |item| item.category == category)
}
