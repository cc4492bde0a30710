// Question catalog: categories, tiers, records, and the delimited-text parser
// Built once at startup and treated as read-only afterwards

use rand::Rng;
use thiserror::Error;
use tracing::info;

/// Number of category columns on the board
pub const CATEGORY_COUNT: usize = 6;
/// Number of point-value rows on the board
pub const TIER_COUNT: usize = 5;
/// Total number of board cells
pub const CELL_COUNT: usize = CATEGORY_COUNT * TIER_COUNT;

/// Question categories, in board-column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Math,
    ComputerHistory,
    Food,
    Animals,
    UsHistory,
    Sports,
}

impl Category {
    /// All categories in column order
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Math,
        Category::ComputerHistory,
        Category::Food,
        Category::Animals,
        Category::UsHistory,
        Category::Sports,
    ];

    /// Catalog-file / display name for this category
    /// Should remain stable: the question data keys on it
    pub fn name(&self) -> &'static str {
        match self {
            Category::Math => "Math",
            Category::ComputerHistory => "Computer History",
            Category::Food => "Food",
            Category::Animals => "Animals",
            Category::UsHistory => "U.S. History",
            Category::Sports => "Sports",
        }
    }

    /// Convert category to board column index (0-5)
    pub fn to_index(&self) -> usize {
        match self {
            Category::Math => 0,
            Category::ComputerHistory => 1,
            Category::Food => 2,
            Category::Animals => 3,
            Category::UsHistory => 4,
            Category::Sports => 5,
        }
    }

    /// Look up a category by its catalog-file name
    pub fn from_name(s: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.name() == s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Point-value tiers, in ascending board-row order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    T200,
    T400,
    T600,
    T800,
    T1000,
}

impl Tier {
    /// All tiers in row order
    pub const ALL: [Tier; TIER_COUNT] = [Tier::T200, Tier::T400, Tier::T600, Tier::T800, Tier::T1000];

    /// Point value awarded or deducted for this tier
    pub fn value(&self) -> i32 {
        match self {
            Tier::T200 => 200,
            Tier::T400 => 400,
            Tier::T600 => 600,
            Tier::T800 => 800,
            Tier::T1000 => 1000,
        }
    }

    /// Convert tier to board row index (0-4)
    pub fn to_index(&self) -> usize {
        match self {
            Tier::T200 => 0,
            Tier::T400 => 1,
            Tier::T600 => 2,
            Tier::T800 => 3,
            Tier::T1000 => 4,
        }
    }

    /// Look up a tier by its catalog-file value string ("200".."1000")
    pub fn from_value(s: &str) -> Option<Tier> {
        match s {
            "200" => Some(Tier::T200),
            "400" => Some(Tier::T400),
            "600" => Some(Tier::T600),
            "800" => Some(Tier::T800),
            "1000" => Some(Tier::T1000),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Convert (category, tier) to a flat bank index
pub fn cell_index(category: Category, tier: Tier) -> usize {
    category.to_index() * TIER_COUNT + tier.to_index()
}

/// A single question with its answer choices
/// Every choice is stored fully formatted (label + " " + text, the correct
/// answer included); the correct choice is always first before shuffling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub prompt: String,
    pub answer: String,
    pub distractors: Vec<String>,
}

impl QuestionRecord {
    /// Total number of answer choices
    pub fn choice_count(&self) -> usize {
        1 + self.distractors.len()
    }

    /// All choices in stored order, the correct answer first
    pub fn choices(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.answer.as_str()).chain(self.distractors.iter().map(String::as_str))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("line {line}: unknown category \"{name}\"")]
    UnknownCategory { line: usize, name: String },
    #[error("line {line}: unknown tier value \"{value}\"")]
    UnknownTier { line: usize, value: String },
    #[error("line {line}: record has {fields} field(s), expected at least 5")]
    MalformedLine { line: usize, fields: usize },
    #[error("question catalog leaves {} of 30 board cell(s) empty", .missing.len())]
    IncompleteCatalog { missing: Vec<(Category, Tier)> },
    #[error("no questions indexed for {category} ${tier}")]
    UnknownCell { category: Category, tier: Tier },
}

/// Read-only question index covering every board cell
#[derive(Debug, Clone)]
pub struct Catalog {
    banks: Vec<Vec<QuestionRecord>>,
}

impl Catalog {
    /// Parse raw catalog text into a fully-populated catalog
    ///
    /// Each non-empty line is one record, fields separated by `%`:
    /// category, tier, prompt, answer label, then one or more answer texts.
    /// The first answer text is the correct one; every answer text is
    /// prefixed with the shared label. Both `\n` and `\r\n` endings work.
    pub fn parse(text: &str) -> Result<Catalog, CatalogError> {
        let mut banks: Vec<Vec<QuestionRecord>> = vec![Vec::new(); CELL_COUNT];
        let mut total = 0usize;
        for (num, line) in text.lines().enumerate() {
            let line_no = num + 1;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('%').collect();
            if fields.len() < 5 {
                return Err(CatalogError::MalformedLine { line: line_no, fields: fields.len() });
            }
            let category = Category::from_name(fields[0]).ok_or_else(|| CatalogError::UnknownCategory {
                line: line_no,
                name: fields[0].to_string(),
            })?;
            let tier = Tier::from_value(fields[1]).ok_or_else(|| CatalogError::UnknownTier {
                line: line_no,
                value: fields[1].to_string(),
            })?;
            // the label is glued onto every choice, the correct answer included
            let label = fields[3];
            let answer = format!("{} {}", label, fields[4]);
            let distractors = fields[5..].iter().map(|t| format!("{} {}", label, t)).collect();
            banks[cell_index(category, tier)].push(QuestionRecord {
                prompt: fields[2].to_string(),
                answer,
                distractors,
            });
            total += 1;
        }
        // a board cell with no backing question is a data error, not something
        // to paper over at runtime
        let missing: Vec<(Category, Tier)> = Category::ALL
            .iter()
            .flat_map(|c| Tier::ALL.iter().map(move |t| (*c, *t)))
            .filter(|(c, t)| banks[cell_index(*c, *t)].is_empty())
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::IncompleteCatalog { missing });
        }
        info!(questions = total, "question catalog loaded");
        Ok(Catalog { banks })
    }

    /// Draw a uniformly random question for the given cell
    ///
    /// Lookup never mutates the catalog; without-replacement play across a
    /// game comes from the session's cell consumption, not from here.
    pub fn random_question<R: Rng>(
        &self,
        category: Category,
        tier: Tier,
        rng: &mut R,
    ) -> Result<&QuestionRecord, CatalogError> {
        let bank = &self.banks[cell_index(category, tier)];
        if bank.is_empty() {
            return Err(CatalogError::UnknownCell { category, tier });
        }
        Ok(&bank[rng.gen_range(0..bank.len())])
    }

    /// Number of records stored for one cell
    pub fn cell_len(&self, category: Category, tier: Tier) -> usize {
        self.banks[cell_index(category, tier)].len()
    }
}
