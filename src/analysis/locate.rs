use tracing::debug;

use super::types::ClassifiedSentence;
use crate::highlight::AnnotationSpan;

/// Turn classifier output into spans over `text`
///
/// Each passage is searched for verbatim, starting where the previous match
/// ended, so repeated passages map to successive occurrences. Passages the
/// model paraphrased (or returned out of order) are dropped.
pub fn locate_spans(text: &str, sentences: &[ClassifiedSentence]) -> Vec<AnnotationSpan> {
    let mut cursor = 0;
    let mut spans = Vec::with_capacity(sentences.len());

    for sentence in sentences {
        if sentence.text.is_empty() {
            continue;
        }
        match text[cursor..].find(&sentence.text) {
            Some(pos) => {
                let start = cursor + pos;
                let end = start + sentence.text.len();
                spans.push(AnnotationSpan::new(
                    &sentence.text,
                    sentence.importance,
                    sentence.category,
                    start..end,
                ));
                cursor = end;
            }
            None => debug!("Could not locate passage: {:?}", sentence.text),
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::{Category, ImportanceLevel};

    fn sentence(text: &str) -> ClassifiedSentence {
        ClassifiedSentence {
            text: text.to_string(),
            importance: ImportanceLevel::new(3).unwrap(),
            category: Category::Background,
        }
    }

    #[test]
    fn test_locates_in_order() {
        let text = "Water boils at 100 degrees Celsius. This is important.";
        let spans = locate_spans(
            text,
            &[
                sentence("Water boils at 100 degrees Celsius."),
                sentence("This is important."),
            ],
        );

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].range(), 0..35);
        assert_eq!(spans[1].range(), 36..54);
    }

    #[test]
    fn test_repeated_passage_uses_next_occurrence() {
        let text = "Yes. No. Yes.";
        let spans = locate_spans(text, &[sentence("Yes."), sentence("Yes.")]);

        assert_eq!(spans[0].range(), 0..4);
        assert_eq!(spans[1].range(), 9..13);
    }

    #[test]
    fn test_drops_paraphrase_and_out_of_order() {
        let text = "First point. Second point.";
        let spans = locate_spans(
            text,
            &[
                sentence("Second point."),
                sentence("First point."),
                sentence("A paraphrased point."),
            ],
        );

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Second point.");
    }

    #[test]
    fn test_multibyte_offsets_are_bytes() {
        let text = "Café au lait. Très bien.";
        let spans = locate_spans(text, &[sentence("Très bien.")]);

        assert_eq!(spans[0].offset_start, 15);
        assert_eq!(&text[spans[0].range()], "Très bien.");
    }
}
