//! Aggregated results of a survey.
//!
//! The numbers here are what a results page charts; rendering is left to the
//! caller.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surveyor_types::{Question, QuestionType, Survey, SurveyResponse};
use uuid::Uuid;

use crate::registry;

/// Headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    pub total_responses: usize,

    /// Share of completed responses in percent, one decimal.
    pub completion_rate: f64,

    /// Mean time to complete, in whole minutes.
    pub average_minutes: u64,
}

/// Number of responses submitted on one day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub responses: usize,
}

/// Answer distribution for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResults {
    pub question_id: Uuid,

    pub text: String,

    #[serde(rename = "type")]
    pub kind: QuestionType,

    /// How many responses answered this question.
    pub responses: usize,

    /// `(label, count)` pairs in display order.
    pub data: Vec<(String, usize)>,
}

/// Everything a results page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResults {
    pub summary: ResultsSummary,
    pub timeline: Vec<TimelinePoint>,
    pub questions: Vec<QuestionResults>,
}

impl SurveyResults {
    /// Aggregate responses to a survey. Responses to other surveys are ignored.
    pub fn aggregate(survey: &Survey, responses: &[SurveyResponse]) -> Self {
        let responses: Vec<&SurveyResponse> = responses
            .iter()
            .filter(|response| response.survey_id == survey.id)
            .collect();

        Self {
            summary: summarize(&responses),
            timeline: timeline(&responses),
            questions: survey
                .questions()
                .map(|question| question_results(question, &responses))
                .collect(),
        }
    }

    /// Get the results of one question.
    pub fn question(&self, question_id: Uuid) -> Option<&QuestionResults> {
        self.questions
            .iter()
            .find(|results| results.question_id == question_id)
    }
}

fn summarize(responses: &[&SurveyResponse]) -> ResultsSummary {
    let total = responses.len();
    if total == 0 {
        return ResultsSummary {
            total_responses: 0,
            completion_rate: 0.0,
            average_minutes: 0,
        };
    }

    let completed = responses.iter().filter(|response| response.completed).count();
    let rate = completed as f64 / total as f64 * 100.0;
    let seconds: u64 = responses.iter().map(|response| response.duration_secs).sum();
    let average_secs = seconds as f64 / total as f64;

    ResultsSummary {
        total_responses: total,
        completion_rate: (rate * 10.0).round() / 10.0,
        average_minutes: (average_secs / 60.0).round() as u64,
    }
}

fn timeline(responses: &[&SurveyResponse]) -> Vec<TimelinePoint> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for response in responses {
        *days.entry(response.submitted_at.date_naive()).or_default() += 1;
    }
    days.into_iter()
        .map(|(date, responses)| TimelinePoint { date, responses })
        .collect()
}

fn question_results(question: &Question, responses: &[&SurveyResponse]) -> QuestionResults {
    let answers: Vec<_> = responses
        .iter()
        .filter_map(|response| response.answers.get(question.id))
        .filter(|value| !value.is_blank())
        .collect();

    let data = if registry::has_options(question.kind) {
        question
            .options
            .iter()
            .map(|option| {
                let count = answers
                    .iter()
                    .filter(|value| match value.as_list() {
                        Some(items) => items.iter().any(|item| *item == option.value),
                        None => value.as_str() == Some(option.value.as_str()),
                    })
                    .count();
                (option.text.clone(), count)
            })
            .collect()
    } else {
        let mut data: Vec<(String, usize)> = Vec::new();
        for value in &answers {
            let label = value.label();
            match data.iter_mut().find(|(seen, _)| *seen == label) {
                Some((_, count)) => *count += 1,
                None => data.push((label, 1)),
            }
        }
        data
    };

    QuestionResults {
        question_id: question.id,
        text: question.text.clone(),
        kind: question.kind,
        responses: answers.len(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::create_default_question;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use surveyor_types::{Answers, QuestionOption, Section};

    struct Fixture {
        survey: Survey,
        colour: Uuid,
        toppings: Uuid,
        comment: Uuid,
    }

    fn fixture() -> Fixture {
        let mut survey = Survey::new(Uuid::new_v4()).with_title("Pizza");
        let mut section = Section::new(survey.id, "Main", 0);

        let mut colour = create_default_question(section.id, survey.id, 0);
        colour.kind = QuestionType::MultipleChoice;
        colour.text = "Favourite crust".into();
        colour.options = vec![
            QuestionOption::new("Thin", 0),
            QuestionOption::new("Deep Dish", 1),
            QuestionOption::new("Stuffed", 2),
        ];

        let mut toppings = create_default_question(section.id, survey.id, 1);
        toppings.kind = QuestionType::Checkbox;
        toppings.text = "Toppings".into();
        toppings.options = vec![
            QuestionOption::new("Cheese", 0),
            QuestionOption::new("Basil", 1),
        ];

        let mut comment = create_default_question(section.id, survey.id, 2);
        comment.text = "Anything else?".into();

        let ids = (colour.id, toppings.id, comment.id);
        section.questions = vec![colour, toppings, comment];
        survey.sections.push(section);

        Fixture {
            survey,
            colour: ids.0,
            toppings: ids.1,
            comment: ids.2,
        }
    }

    fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn empty_results() {
        let f = fixture();
        let results = SurveyResults::aggregate(&f.survey, &[]);
        assert_eq!(results.summary.total_responses, 0);
        assert_eq!(results.summary.completion_rate, 0.0);
        assert!(results.timeline.is_empty());

        let crust = results.question(f.colour).unwrap();
        assert_eq!(
            crust.data,
            vec![
                ("Thin".to_string(), 0),
                ("Deep Dish".to_string(), 0),
                ("Stuffed".to_string(), 0),
            ]
        );
    }

    #[test]
    fn aggregates_responses() {
        let f = fixture();
        let responses = vec![
            SurveyResponse::new(
                f.survey.id,
                Answers::new()
                    .with(f.colour, "thin")
                    .with(f.toppings, vec!["cheese", "basil"])
                    .with(f.comment, "More olives"),
            )
            .with_duration_secs(120)
            .with_submitted_at(at(1, 9)),
            SurveyResponse::new(
                f.survey.id,
                Answers::new()
                    .with(f.colour, "deep_dish")
                    .with(f.toppings, vec!["cheese"]),
            )
            .with_duration_secs(240)
            .with_submitted_at(at(1, 17))
            .incomplete(),
            SurveyResponse::new(
                f.survey.id,
                Answers::new()
                    .with(f.colour, "thin")
                    .with(f.comment, "More olives"),
            )
            .with_duration_secs(60)
            .with_submitted_at(at(3, 8))
            .incomplete(),
            SurveyResponse::new(Uuid::new_v4(), Answers::new().with(f.colour, "thin")),
        ];

        let results = SurveyResults::aggregate(&f.survey, &responses);

        assert_eq!(
            results.summary,
            ResultsSummary {
                total_responses: 3,
                completion_rate: 33.3,
                average_minutes: 2,
            }
        );

        assert_eq!(
            results.timeline,
            vec![
                TimelinePoint {
                    date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                    responses: 2,
                },
                TimelinePoint {
                    date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
                    responses: 1,
                },
            ]
        );

        let crust = results.question(f.colour).unwrap();
        assert_eq!(crust.responses, 3);
        assert_eq!(
            crust.data,
            vec![
                ("Thin".to_string(), 2),
                ("Deep Dish".to_string(), 1),
                ("Stuffed".to_string(), 0),
            ]
        );

        let toppings = results.question(f.toppings).unwrap();
        assert_eq!(toppings.responses, 2);
        assert_eq!(
            toppings.data,
            vec![("Cheese".to_string(), 2), ("Basil".to_string(), 1)]
        );

        let comment = results.question(f.comment).unwrap();
        assert_eq!(comment.data, vec![("More olives".to_string(), 2)]);
    }
}
