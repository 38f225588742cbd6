//! Garment-care question sets shipped as the zero-config catalog.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::{AnswerOption, Question, QuestionId, QuestionKind, FALLBACK_ENTRY};

fn radio(id: &str, prompt: &str, options: Vec<AnswerOption>) -> Question {
    Question {
        id: QuestionId(id.to_owned()),
        prompt: prompt.to_owned(),
        kind: QuestionKind::SingleChoice,
        options,
        placeholder: None,
        required: true,
    }
}

fn select(id: &str, prompt: &str, options: Vec<AnswerOption>) -> Question {
    Question { kind: QuestionKind::Select, ..radio(id, prompt, options) }
}

fn textarea(id: &str, prompt: &str, placeholder: &str) -> Question {
    Question {
        id: QuestionId(id.to_owned()),
        prompt: prompt.to_owned(),
        kind: QuestionKind::LongText,
        options: Vec::new(),
        placeholder: Some(placeholder.to_owned()),
        required: true,
    }
}

fn plain(value: &str, label: &str) -> AnswerOption {
    AnswerOption { value: value.to_owned(), label: label.to_owned(), pricing_impact: None }
}

fn weighted(value: &str, label: &str, impact: Decimal) -> AnswerOption {
    AnswerOption { pricing_impact: Some(impact), ..plain(value, label) }
}

// Shorthand for tenths, the granularity every impact below is authored in.
fn tenths(value: i64) -> Decimal {
    Decimal::new(value, 1)
}

pub(super) fn garment_care_entries() -> BTreeMap<String, Vec<Question>> {
    let mut entries = BTreeMap::new();

    entries.insert(
        "alterations".to_owned(),
        vec![
            radio(
                "garment-type",
                "What type of garment?",
                vec![
                    weighted("pants", "Pants/Jeans", tenths(0)),
                    weighted("shirt", "Shirt/Blouse", tenths(0)),
                    weighted("dress", "Dress", tenths(3)),
                    weighted("jacket", "Jacket/Blazer", tenths(5)),
                    weighted("suit", "Full Suit", tenths(8)),
                ],
            ),
            radio(
                "alteration-type",
                "What needs to be done?",
                vec![
                    weighted("hem", "Hemming", tenths(0)),
                    weighted("take-in", "Take in/Let out", tenths(3)),
                    weighted("sleeves", "Shorten sleeves", tenths(2)),
                    weighted("zipper", "Zipper replacement", tenths(1)),
                    weighted("multiple", "Multiple alterations", tenths(6)),
                ],
            ),
            radio(
                "timeline",
                "When do you need it?",
                vec![
                    plain("standard", "Standard (3-5 days)"),
                    plain("soon", "Soon (2-3 days)"),
                    weighted("rush", "Rush/Same-day (+50%)", tenths(5)),
                ],
            ),
        ],
    );

    entries.insert(
        "dry-cleaning".to_owned(),
        vec![
            radio(
                "item-type",
                "What are you bringing in?",
                vec![
                    weighted("shirts", "Shirts/Blouses", tenths(0)),
                    weighted("pants", "Pants/Trousers", tenths(2)),
                    weighted("suit", "Suit", tenths(5)),
                    weighted("dress", "Dress", tenths(4)),
                    weighted("coat", "Coat/Jacket", tenths(6)),
                    weighted("other", "Other items", tenths(3)),
                ],
            ),
            select(
                "quantity",
                "How many items?",
                vec![
                    weighted("1-2", "1-2 items", tenths(0)),
                    weighted("3-5", "3-5 items", Decimal::ONE),
                    weighted("6-10", "6-10 items", Decimal::TWO),
                    weighted("10+", "10+ items", Decimal::from(3)),
                ],
            ),
            radio(
                "timeline",
                "When do you need it?",
                vec![
                    plain("standard", "Standard (2-3 days)"),
                    weighted("rush", "Rush/Same-day (+50%)", tenths(5)),
                ],
            ),
        ],
    );

    entries.insert(
        "wedding-gowns".to_owned(),
        vec![
            radio(
                "service-type",
                "What service do you need?",
                vec![
                    weighted("cleaning", "Cleaning only", tenths(0)),
                    weighted("alterations", "Alterations only", tenths(2)),
                    weighted("both", "Cleaning + Alterations", tenths(5)),
                    weighted("preservation", "Cleaning + Preservation", tenths(3)),
                ],
            ),
            radio(
                "dress-style",
                "What style is the dress?",
                vec![
                    weighted("simple", "Simple/A-line", tenths(0)),
                    weighted("beaded", "Beaded/Embellished", tenths(3)),
                    weighted("train", "Long train", tenths(2)),
                    weighted("elaborate", "Elaborate (ballgown, heavy beading)", tenths(5)),
                ],
            ),
            radio(
                "timeline",
                "When is the event?",
                vec![
                    plain("month+", "More than a month away"),
                    plain("2-4weeks", "2-4 weeks away"),
                    weighted("soon", "Less than 2 weeks (rush fee may apply)", tenths(3)),
                ],
            ),
        ],
    );

    entries.insert(
        "suits-tuxedos".to_owned(),
        vec![
            radio(
                "service-type",
                "What do you need?",
                vec![
                    weighted("cleaning", "Dry cleaning only", tenths(0)),
                    weighted("pressing", "Pressing only", tenths(-2)),
                    weighted("alterations", "Alterations", tenths(5)),
                    weighted("full-service", "Cleaning + Alterations", tenths(8)),
                ],
            ),
            radio(
                "pieces",
                "How many pieces?",
                vec![
                    weighted("jacket", "Jacket only", tenths(0)),
                    weighted("2piece", "2-piece suit", tenths(3)),
                    weighted("3piece", "3-piece suit", tenths(5)),
                ],
            ),
            radio(
                "timeline",
                "When do you need it?",
                vec![
                    plain("standard", "Standard (3-5 days)"),
                    weighted("rush", "Rush (+50%)", tenths(5)),
                ],
            ),
        ],
    );

    entries.insert(
        "leather-suede".to_owned(),
        vec![
            radio(
                "item-type",
                "What type of item?",
                vec![
                    weighted("jacket", "Jacket/Coat", tenths(0)),
                    weighted("pants", "Pants", tenths(-1)),
                    weighted("bag", "Bag/Purse", tenths(-2)),
                    weighted("shoes", "Shoes/Boots", tenths(-3)),
                    weighted("other", "Other", tenths(0)),
                ],
            ),
            radio(
                "material",
                "What material?",
                vec![
                    weighted("leather", "Leather", tenths(0)),
                    weighted("suede", "Suede", tenths(2)),
                    weighted("nubuck", "Nubuck", tenths(2)),
                ],
            ),
            radio(
                "condition",
                "Current condition?",
                vec![
                    weighted("good", "Good (regular cleaning)", tenths(0)),
                    weighted("stained", "Stained/Spots", tenths(3)),
                    weighted("worn", "Worn/Needs conditioning", tenths(4)),
                ],
            ),
        ],
    );

    entries.insert(
        "household".to_owned(),
        vec![
            radio(
                "item-type",
                "What item?",
                vec![
                    weighted("comforter", "Comforter/Duvet", tenths(0)),
                    weighted("drapes", "Drapes/Curtains", tenths(5)),
                    weighted("linens", "Table linens", tenths(-2)),
                    weighted("pillows", "Pillows", tenths(-3)),
                    weighted("other", "Other", tenths(0)),
                ],
            ),
            radio(
                "size",
                "What size?",
                vec![
                    weighted("small", "Small (Twin/Standard)", tenths(0)),
                    weighted("medium", "Medium (Full/Queen)", tenths(3)),
                    weighted("large", "Large (King/Oversized)", tenths(5)),
                ],
            ),
        ],
    );

    entries.insert(
        FALLBACK_ENTRY.to_owned(),
        vec![
            textarea("description", "Tell us about your garment", "Describe what you need done..."),
            radio(
                "timeline",
                "When do you need it?",
                vec![
                    plain("standard", "Standard turnaround"),
                    weighted("rush", "Rush (if possible)", tenths(5)),
                ],
            ),
        ],
    );

    entries
}
