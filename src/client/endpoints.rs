use url::Url;

use crate::config::ApiConfig;
use crate::error::ApiResult;

/// The one endpoint map every page goes through.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    auth_prefix: String,
    records_prefix: String,
}

impl Endpoints {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        Ok(Self {
            base: Url::parse(&config.base_url)?,
            auth_prefix: normalize_prefix(&config.auth_prefix),
            records_prefix: normalize_prefix(&config.records_prefix),
        })
    }

    pub fn register(&self) -> Url {
        self.auth("register/")
    }

    pub fn login(&self) -> Url {
        self.auth("login/")
    }

    pub fn logout(&self) -> Url {
        self.auth("logout/")
    }

    pub fn profile(&self) -> Url {
        self.auth("profile/")
    }

    pub fn students(&self) -> Url {
        self.records("students/")
    }

    pub fn student_search(&self, query: &str) -> Url {
        let mut url = self.records("students/search/");
        url.query_pairs_mut().append_pair("q", query);
        url
    }

    pub fn student(&self, id: i64) -> Url {
        self.records(&format!("students/{id}/"))
    }

    pub fn student_payments(&self, id: i64) -> Url {
        self.records(&format!("students/{id}/payments/"))
    }

    pub fn student_payment_summary(&self, id: i64) -> Url {
        self.records(&format!("students/{id}/payment_summary/"))
    }

    pub fn fee_structures(&self) -> Url {
        self.records("fee-structures/")
    }

    pub fn fee_structure(&self, id: i64) -> Url {
        self.records(&format!("fee-structures/{id}/"))
    }

    pub fn fee_by_grade_board(&self, grade: &str, board: &str) -> Url {
        let mut url = self.records("fee-structures/by_grade_board/");
        url.query_pairs_mut()
            .append_pair("grade", grade)
            .append_pair("board", board);
        url
    }

    pub fn payments(&self) -> Url {
        self.records("payments/")
    }

    pub fn payment(&self, id: i64) -> Url {
        self.records(&format!("payments/{id}/"))
    }

    pub fn payments_overview(&self) -> Url {
        self.records("payments/summary/")
    }

    fn auth(&self, tail: &str) -> Url {
        self.join(&self.auth_prefix, tail)
    }

    fn records(&self, tail: &str) -> Url {
        self.join(&self.records_prefix, tail)
    }

    fn join(&self, prefix: &str, tail: &str) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}{}/{}", self.base.path().trim_end_matches('/'), prefix, tail);
        url.set_path(&path);
        url.set_query(None);
        url
    }
}

/// `api/` -> `/api`, `/` -> ``.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
