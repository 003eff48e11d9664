//! Parallel groups
//!
//! A group runs independent bodies concurrently and only reports once every
//! member has finished, so no sibling is left running when the group fails.

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::error::{BodyError, BodyResult};
use crate::runner::{Context, TaskBody};

/// Body that runs all members concurrently and waits for all of them
pub struct ParallelGroup {
    members: Vec<Box<dyn TaskBody>>,
}

impl ParallelGroup {
    pub fn new(members: Vec<Box<dyn TaskBody>>) -> Self {
        ParallelGroup { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[async_trait]
impl TaskBody for ParallelGroup {
    async fn run(&self, ctx: &Context) -> BodyResult<()> {
        let total = self.members.len();
        debug!(members = total, "starting parallel group");

        let outcomes = join_all(self.members.iter().map(|member| member.run(ctx))).await;

        let errors: Vec<BodyError> = outcomes
            .into_iter()
            .zip(&self.members)
            .filter_map(|(outcome, member)| match outcome {
                Ok(()) => None,
                Err(e) => {
                    warn!(member = %member.describe(), error = %e, "parallel member failed");
                    Some(e)
                }
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BodyError::Parallel { total, errors })
        }
    }

    fn describe(&self) -> String {
        let members: Vec<String> = self.members.iter().map(|m| m.describe()).collect();
        format!("parallel [{}]", members.join(", "))
    }
}
