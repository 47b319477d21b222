//! The form for setting a new savings goal.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error, endpoints,
    goal::core::{GOAL_NAME_MAX_LENGTH, NewGoal},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_error, submit_button, text_input},
    money::Amount,
    validation::{check, parse_date, validate_text},
};

/// The raw goal details as entered in the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_amount: String,
    #[serde(default)]
    pub deadline: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalFieldErrors {
    pub name: Option<String>,
    pub target_amount: Option<String>,
    pub deadline: Option<String>,
}

impl GoalFieldErrors {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_deadline(raw_deadline: &str, today: Date) -> Result<Date, Error> {
    let deadline = parse_date(raw_deadline, "deadline")?;

    if deadline < today {
        return Err(Error::PastDeadline(deadline));
    }

    Ok(deadline)
}

impl GoalFormData {
    /// Validate every field, collecting all the errors.
    ///
    /// `today` is the current date in the server's timezone.
    pub fn validate(&self, today: Date) -> Result<NewGoal, GoalFieldErrors> {
        let mut errors = GoalFieldErrors::default();

        let name = check(
            validate_text(&self.name, "name", GOAL_NAME_MAX_LENGTH, true),
            &mut errors.name,
        );
        let target_amount = check(Amount::parse(&self.target_amount), &mut errors.target_amount);
        let deadline = check(
            parse_deadline(&self.deadline, today).map(Some),
            &mut errors.deadline,
        );

        match deadline {
            Some(deadline) if errors.is_empty() => Ok(NewGoal {
                name,
                target_amount,
                deadline,
            }),
            _ => Err(errors),
        }
    }
}

/// The form for a new goal. The deadline picker starts at `today`.
pub fn goal_form(values: &GoalFormData, errors: &GoalFieldErrors, today: Date) -> Markup {
    html! {
        form
            hx-post=(endpoints::GOALS_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "New Goal" }

            (text_input("name", "Name", "text", &values.name, true, errors.name.as_deref()))

            div
            {
                label for="target_amount" class=(FORM_LABEL_STYLE) { "Target Amount" }

                input
                    name="target_amount"
                    id="target_amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    value=(values.target_amount)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.target_amount.as_deref()))
            }

            div
            {
                label for="deadline" class=(FORM_LABEL_STYLE) { "Deadline" }

                input
                    name="deadline"
                    id="deadline"
                    type="date"
                    min=(today)
                    required
                    value=(values.deadline)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.deadline.as_deref()))
            }

            (submit_button("Create Goal"))
        }
    }
}
