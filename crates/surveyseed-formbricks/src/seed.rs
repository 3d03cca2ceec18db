//! The two upload phases, run against any [`BlobStore`] and [`ManagementApi`].
//!
//! Phase one maps and uploads every survey, then persists the
//! [`JoinTable`]. Phase two reads the join table back and uploads the answers
//! of every survey that was created, pointing each response at the remote
//! survey id. The phases can run in separate invocations.

use std::collections::BTreeMap;

use surveyseed_core::{
  ids::{IdGenerator, RandomIds},
  join::{JoinTable, UploadOutcome},
  store::{self, BlobStore},
};

use crate::{
  Error, Result,
  blocks::map_survey,
  client::ManagementApi,
  precondition::check_artifacts,
  response::{ResponseOptions, map_response},
  upload::{upload_answers, upload_surveys},
};

/// Response outcomes keyed by local survey id, then respondent id.
pub type ResponseOutcomes = BTreeMap<String, BTreeMap<String, UploadOutcome>>;

/// What a full seeding run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
  pub surveys:   JoinTable,
  pub responses: ResponseOutcomes,
}

impl SeedReport {
  /// `(created, failed)` across every response upload.
  pub fn response_counts(&self) -> (usize, usize) {
    self
      .responses
      .values()
      .flat_map(BTreeMap::values)
      .fold((0, 0), |(ok, failed), o| {
        if o.is_created() { (ok + 1, failed) } else { (ok, failed + 1) }
      })
  }
}

pub struct Seeder<'a, S, A, G = RandomIds> {
  store:            &'a S,
  api:              &'a A,
  ids:              G,
  environment_id:   String,
  response_options: ResponseOptions,
}

impl<'a, S, A> Seeder<'a, S, A> {
  pub fn new(store: &'a S, api: &'a A, environment_id: impl Into<String>) -> Self {
    Self {
      store,
      api,
      ids: RandomIds,
      environment_id: environment_id.into(),
      response_options: ResponseOptions::default(),
    }
  }
}

impl<'a, S, A, G> Seeder<'a, S, A, G>
where
  S: BlobStore,
  A: ManagementApi,
  G: IdGenerator,
{
  /// Swap the id generator used for block and logic ids.
  pub fn with_ids<G2: IdGenerator>(self, ids: G2) -> Seeder<'a, S, A, G2> {
    Seeder {
      store: self.store,
      api: self.api,
      ids,
      environment_id: self.environment_id,
      response_options: self.response_options,
    }
  }

  pub fn with_response_options(mut self, options: ResponseOptions) -> Self {
    self.response_options = options;
    self
  }

  /// Check the artifacts line up, then run both phases.
  pub async fn seed(&mut self) -> Result<SeedReport> {
    check_artifacts(self.store).await?;
    let surveys = self.seed_surveys().await?;
    let responses = self.seed_answers().await?;
    Ok(SeedReport { surveys, responses })
  }

  /// Phase one. Surveys that cannot be decoded or mapped are recorded as
  /// failed without a request being made.
  pub async fn seed_surveys(&mut self) -> Result<JoinTable> {
    let repo = store::surveys(self.store);
    let mut table = JoinTable::new();
    let mut payloads = BTreeMap::new();

    for id in repo.list_ids().await? {
      let doc = match repo.get(&id).await {
        Ok(Some(doc)) => doc,
        Ok(None) => {
          tracing::warn!(survey = %id, "survey disappeared while seeding");
          continue;
        }
        Err(surveyseed_core::Error::Serialization(e)) => {
          tracing::warn!(survey = %id, error = %e, "survey artifact is not valid");
          table.insert(id, UploadOutcome::Failed);
          continue;
        }
        Err(e) => return Err(e.into()),
      };

      match map_survey(&doc, &self.environment_id, &mut self.ids) {
        Ok(payload) => {
          payloads.insert(id, payload);
        }
        Err(e) => {
          tracing::warn!(survey = %id, error = %e, "survey cannot be mapped");
          table.insert(id, UploadOutcome::Failed);
        }
      }
    }

    for (id, outcome) in upload_surveys(self.api, &payloads).await {
      table.insert(id, outcome);
    }
    table.save(self.store).await?;

    tracing::info!(
      created = table.created().count(),
      failed = table.failed().count(),
      "survey phase done"
    );
    Ok(table)
  }

  /// Phase two. Needs the join table written by [`Self::seed_surveys`].
  pub async fn seed_answers(&self) -> Result<ResponseOutcomes> {
    let table = JoinTable::load(self.store)
      .await?
      .ok_or(Error::MissingJoinTable)?;
    for id in table.failed() {
      tracing::info!(survey = %id, "skipping answers of survey that failed to upload");
    }

    let repo = store::answers(self.store);
    let mut outcomes = ResponseOutcomes::new();
    for (local_id, remote_id) in table.created() {
      let batch = match repo.get(local_id).await {
        Ok(Some(batch)) => batch,
        Ok(None) => {
          tracing::warn!(survey = %local_id, "no answers generated for survey");
          continue;
        }
        Err(surveyseed_core::Error::Serialization(e)) => {
          tracing::warn!(survey = %local_id, error = %e, "answers artifact is not valid");
          continue;
        }
        Err(e) => return Err(e.into()),
      };

      let payloads: BTreeMap<_, _> = batch
        .iter()
        .map(|(user, answers)| {
          let payload =
            map_response(answers, remote_id, &self.environment_id, &self.response_options);
          (user.clone(), payload)
        })
        .collect();
      outcomes.insert(local_id.to_owned(), upload_answers(self.api, &payloads).await);
    }
    Ok(outcomes)
  }
}
