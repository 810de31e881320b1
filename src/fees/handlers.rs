use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::fees::dto::{annual_fee_for, FeeStructure, FeeStructureForm};
use crate::page::{self, Confirm, PageState};

pub struct FeesPage {
    client: ApiClient,
    pub structures: Vec<FeeStructure>,
    pub state: PageState,
}

impl FeesPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            structures: Vec::new(),
            state: PageState::default(),
        }
    }

    pub async fn mount(&mut self) {
        if self.client.session().is_authenticated().await {
            self.refresh().await;
        }
    }

    #[instrument(skip_all)]
    pub async fn refresh(&mut self) {
        self.state.start();
        match FeeStructure::list(&self.client).await {
            Ok(list) => {
                self.structures = list;
                self.state.succeed();
            }
            Err(e) => self.state.fail_with(&e, "fetch fee structures"),
        }
    }

    #[instrument(skip_all, fields(grade = %form.grade, board = %form.board))]
    pub async fn create(&mut self, form: &FeeStructureForm) -> Option<FeeStructure> {
        if let Err(message) = form.validate() {
            self.state.fail(message);
            return None;
        }
        self.state.start();
        match FeeStructure::create(&self.client, form).await {
            Ok(created) => {
                info!(id = created.id, "fee structure created");
                page::upsert(&mut self.structures, created.clone());
                self.state.succeed();
                Some(created)
            }
            Err(e) => {
                self.state.fail_with(&e, "add fee structure");
                None
            }
        }
    }

    #[instrument(skip_all, fields(id = id))]
    pub async fn update(&mut self, id: i64, form: &FeeStructureForm) -> Option<FeeStructure> {
        if let Err(message) = form.validate() {
            self.state.fail(message);
            return None;
        }
        self.state.start();
        match FeeStructure::update(&self.client, id, form).await {
            Ok(updated) => {
                page::upsert(&mut self.structures, updated.clone());
                self.state.succeed();
                Some(updated)
            }
            Err(e) => {
                self.state.fail_with(&e, "update fee structure");
                None
            }
        }
    }

    #[instrument(skip_all, fields(id = id))]
    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm("Are you sure you want to delete this fee structure?") {
            return false;
        }
        self.state.start();
        match FeeStructure::delete(&self.client, id).await {
            Ok(()) => {
                page::remove(&mut self.structures, id);
                self.state.succeed();
                true
            }
            Err(e) => {
                self.state.fail_with(&e, "delete fee structure");
                false
            }
        }
    }

    /// Backend lookup for one grade/board pair.
    pub async fn lookup(&mut self, grade: &str, board: &str) -> Option<FeeStructure> {
        self.state.start();
        match FeeStructure::by_grade_board(&self.client, grade, board).await {
            Ok(found) => {
                self.state.succeed();
                found.into_iter().find(|f| f.matches(grade, board))
            }
            Err(e) => {
                self.state.fail_with(&e, "fetch fee structure");
                None
            }
        }
    }

    pub fn annual_fee(&self, grade: &str, board: &str) -> f64 {
        annual_fee_for(&self.structures, grade, board)
    }
}
