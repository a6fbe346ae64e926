//! Restores contiguous ordering after structural changes.
//!
//! All functions are pure: they take the current list, return a new one and
//! never touch their input. Questions of every section travel together in one
//! flat list keyed by `section_id`; each function only renumbers the sections
//! it was asked about. Reindexing is always whole-list.

use surveyor_types::{Direction, EditError, Question, QuestionOption, Section};
use uuid::Uuid;

use crate::validation;

/// Renumber one section's questions.
///
/// The section's questions are stably sorted by their current `order`, given
/// `order = index`, first/last flags and a fresh validation result, and
/// written back into the slots they already occupied. Questions of other
/// sections are returned unchanged.
pub fn reindex_questions(section_id: Uuid, all: &[Question]) -> Vec<Question> {
    let mut result = all.to_vec();

    let slots: Vec<usize> = result
        .iter()
        .enumerate()
        .filter(|(_, question)| question.section_id == section_id)
        .map(|(slot, _)| slot)
        .collect();

    let mut siblings: Vec<Question> = slots.iter().map(|&slot| result[slot].clone()).collect();
    siblings.sort_by_key(|question| question.order);

    let len = siblings.len();
    for ((index, mut question), slot) in siblings.into_iter().enumerate().zip(slots) {
        question.order = index;
        question.is_first = index == 0;
        question.is_last = index + 1 == len;
        validation::refresh(&mut question);
        result[slot] = question;
    }

    result
}

/// Renumber an option list by its current `order`.
pub fn reindex_options(options: &[QuestionOption]) -> Vec<QuestionOption> {
    let mut options = options.to_vec();
    options.sort_by_key(|option| option.order);
    for (index, option) in options.iter_mut().enumerate() {
        option.order = index;
    }
    options
}

/// Renumber sections by their current `order`.
pub fn reindex_sections(sections: &[Section]) -> Vec<Section> {
    let mut sections = sections.to_vec();
    sections.sort_by_key(|section| section.order);
    for (index, section) in sections.iter_mut().enumerate() {
        section.order = index;
    }
    sections
}

/// Swap a question with its neighbour inside its section.
///
/// Moving the first question up or the last one down returns the list as it is.
pub fn move_question(
    question_id: Uuid,
    direction: Direction,
    all: &[Question],
) -> Result<Vec<Question>, EditError> {
    let section_id = find_question(question_id, all)?.section_id;
    let mut sequence = sequence_of(section_id, all);

    let Some(position) = sequence.iter().position(|&id| id == question_id) else {
        return Err(EditError::QuestionNotFound(question_id));
    };
    let Some(target) = step(position, direction, sequence.len()) else {
        return Ok(all.to_vec());
    };

    sequence.swap(position, target);
    Ok(apply_sequence(section_id, &sequence, all))
}

/// Move a question into another section (or elsewhere in its own) at
/// `target_index`, clamped to the target section's length.
///
/// Both the source and the destination section are renumbered.
pub fn move_question_to_section(
    question_id: Uuid,
    target_section_id: Uuid,
    target_index: usize,
    all: &[Question],
) -> Result<Vec<Question>, EditError> {
    let source_slot = all
        .iter()
        .position(|question| question.id == question_id)
        .ok_or(EditError::QuestionNotFound(question_id))?;

    let mut result = all.to_vec();
    let mut moved = result.remove(source_slot);
    let source_section_id = moved.section_id;
    moved.section_id = target_section_id;

    let mut sequence = sequence_of(target_section_id, &result);
    sequence.insert(target_index.min(sequence.len()), question_id);

    let insert_at = result
        .iter()
        .rposition(|question| question.section_id == target_section_id)
        .map_or(result.len(), |slot| slot + 1);
    result.insert(insert_at, moved);

    let result = apply_sequence(target_section_id, &sequence, &result);
    if source_section_id == target_section_id {
        Ok(result)
    } else {
        Ok(reindex_questions(source_section_id, &result))
    }
}

/// Drag-and-drop inside one section: move the question at `source_index` to
/// `destination_index`. An unknown source position leaves the list as it is.
pub fn reorder_questions(
    section_id: Uuid,
    source_index: usize,
    destination_index: usize,
    all: &[Question],
) -> Vec<Question> {
    let mut sequence = sequence_of(section_id, all);
    if source_index >= sequence.len() {
        return all.to_vec();
    }
    let id = sequence.remove(source_index);
    sequence.insert(destination_index.min(sequence.len()), id);
    apply_sequence(section_id, &sequence, all)
}

/// Drag-and-drop for options: move the option at `source_index` to
/// `destination_index`, then renumber.
pub fn reorder_options(
    options: &[QuestionOption],
    source_index: usize,
    destination_index: usize,
) -> Vec<QuestionOption> {
    let mut options = reindex_options(options);
    if source_index >= options.len() {
        return options;
    }
    let option = options.remove(source_index);
    options.insert(destination_index.min(options.len()), option);
    for (index, option) in options.iter_mut().enumerate() {
        option.order = index;
    }
    options
}

/// Swap an option with its neighbour. No-op at either end.
pub fn move_option(
    question: &Question,
    option_id: Uuid,
    direction: Direction,
) -> Result<Vec<QuestionOption>, EditError> {
    let options = reindex_options(&question.options);
    let position = options
        .iter()
        .position(|option| option.id == option_id)
        .ok_or(EditError::OptionNotFound {
            question_id: question.id,
            option_id,
        })?;

    match step(position, direction, options.len()) {
        Some(target) => Ok(reorder_options(&options, position, target)),
        None => Ok(options),
    }
}

/// Swap a section with its neighbour. No-op at either end.
pub fn move_section(
    sections: &[Section],
    section_id: Uuid,
    direction: Direction,
) -> Result<Vec<Section>, EditError> {
    let mut sections = reindex_sections(sections);
    let position = sections
        .iter()
        .position(|section| section.id == section_id)
        .ok_or(EditError::SectionNotFound(section_id))?;

    if let Some(target) = step(position, direction, sections.len()) {
        sections.swap(position, target);
        for (index, section) in sections.iter_mut().enumerate() {
            section.order = index;
        }
    }
    Ok(sections)
}

fn find_question(question_id: Uuid, all: &[Question]) -> Result<&Question, EditError> {
    all.iter()
        .find(|question| question.id == question_id)
        .ok_or(EditError::QuestionNotFound(question_id))
}

fn step(position: usize, direction: Direction, len: usize) -> Option<usize> {
    match direction {
        Direction::Up => position.checked_sub(1),
        Direction::Down => (position + 1 < len).then_some(position + 1),
    }
}

/// Ids of a section's questions in their current order.
fn sequence_of(section_id: Uuid, all: &[Question]) -> Vec<Uuid> {
    let mut siblings: Vec<&Question> = all
        .iter()
        .filter(|question| question.section_id == section_id)
        .collect();
    siblings.sort_by_key(|question| question.order);
    siblings.into_iter().map(|question| question.id).collect()
}

/// Give the section's questions the order of `sequence`, then reindex.
fn apply_sequence(section_id: Uuid, sequence: &[Uuid], all: &[Question]) -> Vec<Question> {
    let mut result = all.to_vec();
    for question in result
        .iter_mut()
        .filter(|question| question.section_id == section_id)
    {
        if let Some(index) = sequence.iter().position(|&id| id == question.id) {
            question.order = index;
        }
    }
    reindex_questions(section_id, &result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{create_default_option, create_default_question};
    use pretty_assertions::assert_eq;

    fn section_questions(section_id: Uuid, count: usize) -> Vec<Question> {
        let survey_id = Uuid::new_v4();
        let mut questions: Vec<Question> = (0..count)
            .map(|order| create_default_question(section_id, survey_id, order))
            .collect();
        for (index, question) in questions.iter_mut().enumerate() {
            question.text = format!("Q{index}");
        }
        reindex_questions(section_id, &questions)
    }

    fn ids_in_order(section_id: Uuid, all: &[Question]) -> Vec<Uuid> {
        sequence_of(section_id, all)
    }

    fn orders(section_id: Uuid, all: &[Question]) -> Vec<usize> {
        let mut orders: Vec<usize> = all
            .iter()
            .filter(|q| q.section_id == section_id)
            .map(|q| q.order)
            .collect();
        orders.sort_unstable();
        orders
    }

    #[test]
    fn reindex_closes_gaps_and_sets_flags() {
        let section = Uuid::new_v4();
        let mut questions = section_questions(section, 3);
        questions[0].order = 4;
        questions[1].order = 9;
        questions[2].order = 1;

        let reindexed = reindex_questions(section, &questions);
        let texts: Vec<_> = reindexed.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["Q2", "Q0", "Q1"]);
        assert_eq!(orders(section, &reindexed), vec![0, 1, 2]);
        assert!(reindexed[0].is_first && !reindexed[0].is_last);
        assert!(!reindexed[2].is_first && reindexed[2].is_last);
    }

    #[test]
    fn reindex_leaves_other_sections_alone() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut all = section_questions(a, 2);
        let mut other = section_questions(b, 2);
        other[1].order = 7;
        all.extend(other.clone());

        let reindexed = reindex_questions(a, &all);
        assert_eq!(&reindexed[2..], &other[..]);
    }

    #[test]
    fn reindex_revalidates() {
        let section = Uuid::new_v4();
        let mut questions = section_questions(section, 1);
        questions[0].required = true;
        questions[0].text.clear();
        questions[0].is_valid = true;

        let reindexed = reindex_questions(section, &questions);
        assert!(!reindexed[0].is_valid);
    }

    #[test]
    fn move_up_and_down() {
        let section = Uuid::new_v4();
        let questions = section_questions(section, 3);
        let ids = ids_in_order(section, &questions);

        let moved = move_question(ids[2], Direction::Up, &questions).unwrap();
        assert_eq!(ids_in_order(section, &moved), vec![ids[0], ids[2], ids[1]]);

        let moved = move_question(ids[0], Direction::Down, &moved).unwrap();
        assert_eq!(ids_in_order(section, &moved), vec![ids[2], ids[0], ids[1]]);
        assert_eq!(orders(section, &moved), vec![0, 1, 2]);
    }

    #[test]
    fn move_at_boundaries_is_noop() {
        let section = Uuid::new_v4();
        let questions = section_questions(section, 3);
        let ids = ids_in_order(section, &questions);

        assert_eq!(move_question(ids[0], Direction::Up, &questions).unwrap(), questions);
        assert_eq!(move_question(ids[2], Direction::Down, &questions).unwrap(), questions);
    }

    #[test]
    fn move_unknown_question_fails() {
        let missing = Uuid::new_v4();
        let questions = section_questions(Uuid::new_v4(), 2);
        assert_eq!(
            move_question(missing, Direction::Up, &questions),
            Err(EditError::QuestionNotFound(missing))
        );
    }

    #[test]
    fn move_to_other_section() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut all = section_questions(a, 3);
        all.extend(section_questions(b, 2));
        let a_ids = ids_in_order(a, &all);
        let b_ids = ids_in_order(b, &all);

        let moved = move_question_to_section(a_ids[1], b, 1, &all).unwrap();
        assert_eq!(ids_in_order(a, &moved), vec![a_ids[0], a_ids[2]]);
        assert_eq!(ids_in_order(b, &moved), vec![b_ids[0], a_ids[1], b_ids[1]]);
        assert_eq!(orders(a, &moved), vec![0, 1]);
        assert_eq!(orders(b, &moved), vec![0, 1, 2]);

        let question = moved.iter().find(|q| q.id == a_ids[1]).unwrap();
        assert_eq!(question.section_id, b);
        assert!(!question.is_first && !question.is_last);
    }

    #[test]
    fn move_to_empty_section_clamps_index() {
        let a = Uuid::new_v4();
        let empty = Uuid::new_v4();
        let all = section_questions(a, 2);
        let ids = ids_in_order(a, &all);

        let moved = move_question_to_section(ids[0], empty, 99, &all).unwrap();
        assert_eq!(ids_in_order(empty, &moved), vec![ids[0]]);
        let question = moved.iter().find(|q| q.id == ids[0]).unwrap();
        assert!(question.is_first && question.is_last);
        assert_eq!(ids_in_order(a, &moved), vec![ids[1]]);
    }

    #[test]
    fn move_within_same_section() {
        let a = Uuid::new_v4();
        let all = section_questions(a, 3);
        let ids = ids_in_order(a, &all);

        let moved = move_question_to_section(ids[0], a, 2, &all).unwrap();
        assert_eq!(ids_in_order(a, &moved), vec![ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn reorder_questions_by_index() {
        let a = Uuid::new_v4();
        let all = section_questions(a, 4);
        let ids = ids_in_order(a, &all);

        let reordered = reorder_questions(a, 3, 0, &all);
        assert_eq!(
            ids_in_order(a, &reordered),
            vec![ids[3], ids[0], ids[1], ids[2]]
        );
        assert_eq!(reorder_questions(a, 10, 0, &all), all);
    }

    #[test]
    fn options_reorder_and_move() {
        let section = Uuid::new_v4();
        let mut question = create_default_question(section, Uuid::new_v4(), 0);
        question.options = (0..3)
            .map(|order| {
                let mut option = create_default_option(order);
                option.text = format!("O{order}");
                option
            })
            .collect();

        let reordered = reorder_options(&question.options, 0, 2);
        let texts: Vec<_> = reordered.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["O1", "O2", "O0"]);
        assert_eq!(reordered.iter().map(|o| o.order).collect::<Vec<_>>(), vec![0, 1, 2]);

        let first = question.options[0].id;
        let moved = move_option(&question, first, Direction::Up).unwrap();
        assert_eq!(moved, question.options);

        let moved = move_option(&question, first, Direction::Down).unwrap();
        assert_eq!(moved[1].id, first);

        let missing = Uuid::new_v4();
        assert_eq!(
            move_option(&question, missing, Direction::Down),
            Err(EditError::OptionNotFound {
                question_id: question.id,
                option_id: missing,
            })
        );
    }

    #[test]
    fn sections_reindex_and_move() {
        let survey = Uuid::new_v4();
        let sections = vec![
            Section::new(survey, "B", 5),
            Section::new(survey, "A", 2),
            Section::new(survey, "C", 8),
        ];
        let reindexed = reindex_sections(&sections);
        let titles: Vec<_> = reindexed.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(reindexed.iter().map(|s| s.order).collect::<Vec<_>>(), vec![0, 1, 2]);

        let moved = move_section(&reindexed, reindexed[2].id, Direction::Up).unwrap();
        let titles: Vec<_> = moved.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C", "B"]);

        let missing = Uuid::new_v4();
        assert_eq!(
            move_section(&moved, missing, Direction::Up),
            Err(EditError::SectionNotFound(missing))
        );
    }
}
