use tracing::{debug, warn};

use crate::models::{Agenda, Lineup, LineupToken};

/// Execute Stage 0: flatten the agenda into a lineup
///
/// Every agenda item emits its topic marker followed by its speakers, so a
/// topic without speakers still marks a topic transition. An item that
/// repeats the label of the item right before it continues that topic.
pub fn flatten_agenda(agenda: &Agenda) -> Lineup {
    let mut tokens = Vec::with_capacity(agenda.items.len() + agenda.speaker_count());
    let mut previous_topic: Option<&str> = None;

    for item in &agenda.items {
        if previous_topic != Some(item.topic.as_str()) {
            tokens.push(LineupToken::Topic(item.topic.clone()));
            previous_topic = Some(item.topic.as_str());
        } else {
            debug!("Topic {:?} announced twice in a row, merging", item.topic);
        }

        tokens.extend(item.speakers.iter().cloned().map(LineupToken::Speaker));
    }

    if tokens.is_empty() {
        warn!("Agenda is empty, no speeches can be attributed");
    }

    Lineup { tokens }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgendaItem;

    fn topic(label: &str) -> LineupToken {
        LineupToken::Topic(label.to_string())
    }

    fn speaker(name: &str) -> LineupToken {
        LineupToken::Speaker(name.to_string())
    }

    #[test]
    fn test_flatten_keeps_agenda_order() {
        let agenda = Agenda::new(vec![
            AgendaItem::new("1 Haushalt", vec!["A (X)".to_string(), "B (Y)".to_string()]),
            AgendaItem::new("2 Schule", vec!["C (Z)".to_string()]),
        ]);

        let lineup = flatten_agenda(&agenda);

        assert_eq!(
            lineup.tokens,
            vec![
                topic("1 Haushalt"),
                speaker("A (X)"),
                speaker("B (Y)"),
                topic("2 Schule"),
                speaker("C (Z)"),
            ]
        );
    }

    #[test]
    fn test_topic_without_speakers_keeps_marker() {
        let agenda = Agenda::new(vec![
            AgendaItem::new("1 Wahl", vec![]),
            AgendaItem::new("2 Schule", vec!["C (Z)".to_string()]),
        ]);

        let lineup = flatten_agenda(&agenda);

        assert_eq!(
            lineup.tokens,
            vec![topic("1 Wahl"), topic("2 Schule"), speaker("C (Z)")]
        );
    }

    #[test]
    fn test_contiguous_repeat_is_one_topic() {
        let agenda = Agenda::new(vec![
            AgendaItem::new("1 Haushalt", vec!["A (X)".to_string()]),
            AgendaItem::new("1 Haushalt", vec!["B (Y)".to_string()]),
            AgendaItem::new("2 Schule", vec![]),
            AgendaItem::new("1 Haushalt", vec![]),
        ]);

        let lineup = flatten_agenda(&agenda);

        assert_eq!(lineup.topic_count(), 3);
        assert_eq!(lineup.speakers_of(0).collect::<Vec<_>>(), vec!["A (X)", "B (Y)"]);
    }

    #[test]
    fn test_empty_agenda() {
        let lineup = flatten_agenda(&Agenda::default());
        assert!(lineup.is_empty());
    }
}
