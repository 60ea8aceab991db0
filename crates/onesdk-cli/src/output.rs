//! Tab-separated row rendering for API records.

use onesdk_api::{Book, Chapter, Character, Movie, Quote};

/// A record printable as one tab-separated line.
pub trait TableRow {
    /// Column header line.
    const HEADER: &'static str;

    /// Renders the record's columns.
    fn row(&self) -> String;
}

const fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

impl TableRow for Book {
    const HEADER: &'static str = "ID\t\t\t\tName";

    fn row(&self) -> String {
        format!("{}\t{}", self.id, self.name)
    }
}

impl TableRow for Movie {
    const HEADER: &'static str =
        "ID\t\t\t\tRuntime\tBudget\tBoxOffice\tNoms\tWins\tRT\tName";

    fn row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t\t{}\t{}\t{}\t{}",
            self.id,
            self.runtime_in_minutes,
            self.budget_in_millions,
            self.box_office_revenue_in_millions,
            self.academy_award_nominations,
            self.academy_award_wins,
            self.rotten_tomatoes_score,
            self.name,
        )
    }
}

impl TableRow for Chapter {
    const HEADER: &'static str = "ID\t\t\t\tBook\t\t\t\tName";

    fn row(&self) -> String {
        format!(
            "{}\t{}\t{}",
            self.id,
            or_dash(self.book.as_deref()),
            self.chapter_name
        )
    }
}

impl TableRow for Character {
    const HEADER: &'static str = "ID\t\t\t\tRace\tGender\tRealm\tName";

    fn row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.id,
            or_dash(self.race.as_deref()),
            or_dash(self.gender.as_deref()),
            or_dash(self.realm.as_deref()),
            self.name,
        )
    }
}

impl TableRow for Quote {
    const HEADER: &'static str = "ID\t\t\t\tMovie\t\t\t\tCharacter\t\t\tDialog";

    fn row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.id,
            self.movie,
            self.character,
            self.dialog.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_row_without_book() {
        // Arrange
        let chapter = Chapter {
            id: String::from("c1"),
            chapter_name: String::from("A Long-expected Party"),
            book: None,
        };

        // Act
        let row = chapter.row();

        // Assert
        assert_eq!(row, "c1\t-\tA Long-expected Party");
    }

    #[test]
    fn test_character_row_blank_fields_dashed() {
        // Arrange
        let character = Character {
            id: String::from("x"),
            name: String::from("Frodo Baggins"),
            race: Some(String::from("Hobbit")),
            gender: Some(String::new()),
            birth: None,
            death: None,
            spouse: None,
            realm: None,
            hair: None,
            height: None,
            wiki_url: None,
        };

        // Act
        let row = character.row();

        // Assert
        assert_eq!(row, "x\tHobbit\t-\t-\tFrodo Baggins");
    }

    #[test]
    fn test_quote_row_trims_dialog() {
        // Arrange
        let quote = Quote {
            id: String::from("q"),
            dialog: String::from("  Deagol!  "),
            movie: String::from("m"),
            character: String::from("c"),
        };

        // Act & Assert
        assert_eq!(quote.row(), "q\tm\tc\tDeagol!");
    }
}
