//! Credit-rating scale.
//!
//! Ratings form a fixed total order from `AAA` (strongest) to `E`
//! (insufficient information). Values outside the vocabulary have no rank
//! and are left out of any rating-ordered output.

use serde::Serialize;

/// Fixed rating order, strongest first.
pub const RATING_ORDER: [&str; 19] = [
    "AAA", "AA+", "AA", "AA-", "A+", "A", "A-", "BBB+", "BBB", "BBB-", "BB+", "BB", "BB-", "B+",
    "B", "B-", "C", "D", "E",
];

/// Position of `rating` in [`RATING_ORDER`], or `None` when it is not part of
/// the vocabulary.
///
/// Surrounding whitespace is ignored; matching is otherwise exact.
///
/// # Examples
///
/// ```
/// use tasas_core::types::rating_rank;
///
/// assert_eq!(rating_rank("AAA"), Some(0));
/// assert!(rating_rank("AA-") < rating_rank("BBB"));
/// assert_eq!(rating_rank("NR"), None);
/// ```
pub fn rating_rank(rating: &str) -> Option<usize> {
    let rating = rating.trim();
    RATING_ORDER.iter().position(|r| *r == rating)
}

/// One line of the rating guide shown next to the box plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingGuideEntry {
    /// Base category (without `+`/`-` modifier)
    pub category: &'static str,
    /// Short label
    pub label: &'static str,
    /// Plain-language meaning
    pub description: &'static str,
}

/// Plain-language meaning of each base rating category.
pub const RATING_GUIDE: [RatingGuideEntry; 9] = [
    RatingGuideEntry {
        category: "AAA",
        label: "La mejor categoría",
        description: "Es muy probable que el emisor pague el dinero prestado en los términos acordados sin importar los cambios económicos.",
    },
    RatingGuideEntry {
        category: "AA",
        label: "Muy buena",
        description: "Es probable que el emisor pague como se acordó, pero puede ser un poco menos resistente a cambios económicos.",
    },
    RatingGuideEntry {
        category: "A",
        label: "Buena",
        description: "Probablemente se pagará según lo acordado, pero puede ser más vulnerable a cambios económicos.",
    },
    RatingGuideEntry {
        category: "BBB",
        label: "Suficiente",
        description: "Es probable que se pague, pero existe un riesgo mayor de que se vea afectado por cambios económicos.",
    },
    RatingGuideEntry {
        category: "BB",
        label: "Aceptable",
        description: "Es posible que se pague, pero la capacidad de pago es variable y puede verse afectada por cambios económicos, incluso con retrasos en los pagos.",
    },
    RatingGuideEntry {
        category: "B",
        label: "Mínima",
        description: "Hay capacidad limitada para pagar y es muy variable, con riesgo de pérdida de dinero.",
    },
    RatingGuideEntry {
        category: "C",
        label: "Alto riesgo",
        description: "La capacidad de pago es insuficiente, lo que aumenta el riesgo de pérdida de dinero.",
    },
    RatingGuideEntry {
        category: "D",
        label: "Riesgo extremo",
        description: "El emisor no puede pagar como se acordó, hay incumplimientos en los pagos o una posible quiebra en curso.",
    },
    RatingGuideEntry {
        category: "E",
        label: "Sin información suficiente",
        description: "No hay datos adecuados para evaluar la solidez financiera.",
    },
];

/// Note shown under the guide about rating modifiers.
pub const RATING_MODIFIER_NOTE: &str =
    "Nota adicional: Puede haber símbolos \"+\" o \"-\" en las categorías AA a B para indicar fortalezas o debilidades dentro de esas categorías.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_strongest_first() {
        assert_eq!(RATING_ORDER.first(), Some(&"AAA"));
        assert_eq!(RATING_ORDER.last(), Some(&"E"));
        assert!(rating_rank("A+") < rating_rank("A"));
        assert!(rating_rank("BBB-") < rating_rank("BB+"));
    }

    #[test]
    fn test_unknown_rating_has_no_rank() {
        assert_eq!(rating_rank("Z"), None);
        assert_eq!(rating_rank(""), None);
        assert_eq!(rating_rank("aaa"), None);
    }

    #[test]
    fn test_rank_ignores_padding() {
        assert_eq!(rating_rank(" BBB "), rating_rank("BBB"));
    }

    #[test]
    fn test_guide_categories_are_ranked() {
        for entry in RATING_GUIDE.iter() {
            assert!(rating_rank(entry.category).is_some(), "{}", entry.category);
        }
    }

    #[test]
    fn test_guide_is_in_spanish() {
        let guide_a = RATING_GUIDE.iter().find(|e| e.category == "A").unwrap();
        assert_eq!(guide_a.label, "Buena");
        assert!(RATING_MODIFIER_NOTE.contains("categorías AA a B"));
    }
}
