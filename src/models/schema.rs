//! Field table for the book record
//!
//! A payload key is accepted only if it names a row here for the given intent.

/// Lowest accepted publication year
pub const YEAR_MIN: i32 = 1000;
/// Highest accepted publication year
pub const YEAR_MAX: i32 = 9999;

/// Operation a payload is checked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Create,
    Update,
}

/// Recognized book fields, in column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Isbn,
    AmazonUrl,
    Author,
    Language,
    Pages,
    Publisher,
    Title,
    Year,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Isbn,
        Field::AmazonUrl,
        Field::Author,
        Field::Language,
        Field::Pages,
        Field::Publisher,
        Field::Title,
        Field::Year,
    ];

    /// Key used in payloads and column name in storage
    pub fn name(self) -> &'static str {
        match self {
            Field::Isbn => "isbn",
            Field::AmazonUrl => "amazon_url",
            Field::Author => "author",
            Field::Language => "language",
            Field::Pages => "pages",
            Field::Publisher => "publisher",
            Field::Title => "title",
            Field::Year => "year",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// Type constraint of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any string
    Text,
    /// String with at least one non-whitespace character
    NonEmptyText,
    /// Absolute http(s) URL
    Url,
    /// JSON integer strictly greater than zero
    PositiveInteger,
    /// JSON integer between YEAR_MIN and YEAR_MAX
    Year,
}

impl FieldKind {
    /// Human-readable JSON type expected for this kind
    pub fn expected(self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::NonEmptyText | FieldKind::Url => "a string",
            FieldKind::PositiveInteger | FieldKind::Year => "an integer",
        }
    }
}

/// One row of the field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub kind: FieldKind,
    /// Must be present in the payload
    pub required: bool,
    /// Accepts an explicit null, which clears the stored value
    pub nullable: bool,
}

impl FieldSpec {
    const fn new(field: Field, kind: FieldKind, required: bool) -> Self {
        Self {
            field,
            kind,
            required,
            nullable: !required,
        }
    }

    pub fn name(&self) -> &'static str {
        self.field.name()
    }
}

const BOOK_FIELDS: [FieldSpec; 8] = [
    FieldSpec::new(Field::Isbn, FieldKind::NonEmptyText, true),
    FieldSpec::new(Field::AmazonUrl, FieldKind::Url, false),
    FieldSpec::new(Field::Author, FieldKind::Text, false),
    FieldSpec::new(Field::Language, FieldKind::Text, false),
    FieldSpec::new(Field::Pages, FieldKind::PositiveInteger, false),
    FieldSpec::new(Field::Publisher, FieldKind::Text, false),
    FieldSpec::new(Field::Title, FieldKind::NonEmptyText, true),
    FieldSpec::new(Field::Year, FieldKind::Year, false),
];

/// Field rules for a given intent.
///
/// Update shares the create rules minus `isbn`, which comes from the path,
/// and nothing is required.
pub fn describe(intent: Intent) -> Vec<FieldSpec> {
    match intent {
        Intent::Create => BOOK_FIELDS.to_vec(),
        Intent::Update => BOOK_FIELDS
            .iter()
            .filter(|spec| spec.field != Field::Isbn)
            .map(|spec| FieldSpec {
                required: false,
                ..*spec
            })
            .collect(),
    }
}
