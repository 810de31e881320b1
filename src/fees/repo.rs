use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::fees::dto::{FeeStructure, FeeStructureForm};

impl FeeStructure {
    pub async fn list(client: &ApiClient) -> ApiResult<Vec<FeeStructure>> {
        client.get(client.endpoints().fee_structures()).await
    }

    pub async fn get(client: &ApiClient, id: i64) -> ApiResult<FeeStructure> {
        client.get(client.endpoints().fee_structure(id)).await
    }

    pub async fn by_grade_board(
        client: &ApiClient,
        grade: &str,
        board: &str,
    ) -> ApiResult<Vec<FeeStructure>> {
        client
            .get(client.endpoints().fee_by_grade_board(grade, board))
            .await
    }

    pub async fn create(client: &ApiClient, form: &FeeStructureForm) -> ApiResult<FeeStructure> {
        client.post(client.endpoints().fee_structures(), form).await
    }

    pub async fn update(
        client: &ApiClient,
        id: i64,
        form: &FeeStructureForm,
    ) -> ApiResult<FeeStructure> {
        client.put(client.endpoints().fee_structure(id), form).await
    }

    pub async fn delete(client: &ApiClient, id: i64) -> ApiResult<()> {
        client.delete(client.endpoints().fee_structure(id)).await
    }
}
