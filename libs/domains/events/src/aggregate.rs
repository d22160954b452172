//! Mutations of the embedded collections of an [`Event`].
//!
//! Batch operations check every entry against the stored state and against
//! the rest of the batch before touching the event, so a rejected batch
//! leaves it unchanged.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::{
    CheckList, CheckListInput, Cost, CostInput, CostPatch, Event, Guest, PaymentDeadline,
    PaymentDeadlineInput, Task,
};
use crate::validation::{
    EMPTY_TASK_MESSAGE, PAYMENT_FIELDS_MESSAGE, PHONE_REQUIRED_MESSAGE, require_non_empty,
};

impl Event {
    /// Only the owner may read or change an event.
    pub fn ensure_owner(&self, caller: Uuid) -> EventResult<()> {
        match self.owner_user_id {
            None => Err(EventError::Integrity(self.id)),
            Some(owner) if owner == caller => Ok(()),
            Some(_) => Err(EventError::Forbidden {
                event_id: self.id,
                caller,
            }),
        }
    }

    pub fn add_costs(&mut self, inputs: Vec<CostInput>) -> EventResult<()> {
        let mut labels: HashSet<String> = self.costs.iter().map(|c| c.label.clone()).collect();
        let mut accepted = Vec::with_capacity(inputs.len());

        for input in inputs {
            let label = require_non_empty("label", input.label.as_deref())?;
            let cost = input
                .cost
                .ok_or_else(|| EventError::Validation("cost is required".to_string()))?;
            if !labels.insert(label.clone()) {
                return Err(EventError::DuplicateCost(label));
            }
            accepted.push(Cost { label, cost });
        }

        self.costs.extend(accepted);
        Ok(())
    }

    fn cost_slot(&self, index: i64) -> EventResult<usize> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < self.costs.len())
            .ok_or(EventError::CostIndexOutOfBounds {
                index,
                len: self.costs.len(),
            })
    }

    pub fn update_cost(&mut self, index: i64, patch: CostPatch) -> EventResult<()> {
        let slot = self.cost_slot(index)?;

        let label = match patch.label.as_deref() {
            Some(raw) => Some(require_non_empty("label", Some(raw))?),
            None => None,
        };
        if let Some(label) = &label {
            let taken = self
                .costs
                .iter()
                .enumerate()
                .any(|(i, c)| i != slot && &c.label == label);
            if taken {
                return Err(EventError::DuplicateCost(label.clone()));
            }
        }

        let entry = &mut self.costs[slot];
        if let Some(label) = label {
            entry.label = label;
        }
        if let Some(cost) = patch.cost {
            entry.cost = cost;
        }
        Ok(())
    }

    pub fn delete_cost(&mut self, index: i64) -> EventResult<Cost> {
        let slot = self.cost_slot(index)?;
        Ok(self.costs.remove(slot))
    }

    /// Merge tasks into their timeframes, creating timeframes as needed.
    pub fn add_check_lists(&mut self, inputs: Vec<CheckListInput>) -> EventResult<()> {
        let mut merged = self.check_lists.clone();

        for input in inputs {
            let timeframe = non_empty(input.timeframe.as_deref())
                .ok_or_else(|| EventError::Validation(EMPTY_TASK_MESSAGE.to_string()))?;

            let position = match merged.iter().position(|c| c.timeframe == timeframe) {
                Some(position) => position,
                None => {
                    merged.push(CheckList {
                        timeframe: timeframe.clone(),
                        tasks: Vec::new(),
                    });
                    merged.len() - 1
                }
            };
            let list = &mut merged[position];

            for task in input.tasks {
                let label = non_empty(task.label.as_deref())
                    .ok_or_else(|| EventError::Validation(EMPTY_TASK_MESSAGE.to_string()))?;
                if list.tasks.iter().any(|t| t.label == label) {
                    return Err(EventError::DuplicateTask {
                        timeframe: timeframe.clone(),
                        label,
                    });
                }
                list.tasks.push(Task {
                    label,
                    completed: task.completed,
                });
            }
        }

        self.check_lists = merged;
        Ok(())
    }

    pub fn set_task_completion(
        &mut self,
        timeframe: &str,
        label: &str,
        completed: bool,
    ) -> EventResult<()> {
        let list = self
            .check_lists
            .iter_mut()
            .find(|c| c.timeframe == timeframe)
            .ok_or_else(|| EventError::TimeframeNotFound(timeframe.to_string()))?;

        let task = list
            .tasks
            .iter_mut()
            .find(|t| t.label == label)
            .ok_or_else(|| EventError::TaskNotFound {
                timeframe: timeframe.to_string(),
                label: label.to_string(),
            })?;

        task.completed = completed;
        Ok(())
    }

    /// New guests start out invited.
    pub fn add_guest(&mut self, name: Option<&str>, phone: Option<&str>) -> EventResult<()> {
        let phone = non_empty(phone)
            .ok_or_else(|| EventError::Validation(PHONE_REQUIRED_MESSAGE.to_string()))?;
        let name = require_non_empty("name", name)?;

        if self.guests.iter().any(|g| g.phone == phone) {
            return Err(EventError::DuplicateGuest(phone));
        }

        self.guests.push(Guest {
            name,
            phone,
            invited: true,
        });
        Ok(())
    }

    pub fn remove_guest(&mut self, phone: Option<&str>) -> EventResult<Guest> {
        let phone = non_empty(phone)
            .ok_or_else(|| EventError::Validation(PHONE_REQUIRED_MESSAGE.to_string()))?;

        let position = self
            .guests
            .iter()
            .position(|g| g.phone == phone)
            .ok_or(EventError::GuestNotFound(phone))?;

        Ok(self.guests.remove(position))
    }

    pub fn add_payment_deadlines(&mut self, inputs: Vec<PaymentDeadlineInput>) -> EventResult<()> {
        let mut keys: HashSet<(String, DateTime<Utc>)> = self
            .payment_deadlines
            .iter()
            .map(|d| (d.supplier_name.clone(), d.date))
            .collect();
        let mut accepted = Vec::with_capacity(inputs.len());

        for input in inputs {
            let (supplier_name, date) =
                payment_key(input.supplier_name.as_deref(), input.date)?;
            if !keys.insert((supplier_name.clone(), date)) {
                return Err(EventError::DuplicatePaymentDeadline {
                    supplier_name,
                    date,
                });
            }
            accepted.push(PaymentDeadline {
                supplier_name,
                date,
                amount: input.amount,
                completed: input.completed,
            });
        }

        self.payment_deadlines.extend(accepted);
        Ok(())
    }

    pub fn set_payment_deadline_completion(
        &mut self,
        supplier_name: Option<&str>,
        date: Option<DateTime<Utc>>,
        completed: bool,
    ) -> EventResult<()> {
        let (supplier_name, date) = payment_key(supplier_name, date)?;

        let deadline = self
            .payment_deadlines
            .iter_mut()
            .find(|d| d.supplier_name == supplier_name && d.date == date)
            .ok_or(EventError::PaymentDeadlineNotFound {
                supplier_name,
                date,
            })?;

        deadline.completed = completed;
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn payment_key(
    supplier_name: Option<&str>,
    date: Option<DateTime<Utc>>,
) -> EventResult<(String, DateTime<Utc>)> {
    match (non_empty(supplier_name), date) {
        (Some(name), Some(date)) => Ok((name, date)),
        _ => Err(EventError::Validation(PAYMENT_FIELDS_MESSAGE.to_string())),
    }
}
