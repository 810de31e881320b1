use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::payments::Payment;
use crate::students::dto::{PaymentSummary, Student, StudentForm};

impl Student {
    pub async fn list(client: &ApiClient) -> ApiResult<Vec<Student>> {
        client.get(client.endpoints().students()).await
    }

    pub async fn search(client: &ApiClient, query: &str) -> ApiResult<Vec<Student>> {
        client.get(client.endpoints().student_search(query)).await
    }

    pub async fn get(client: &ApiClient, id: i64) -> ApiResult<Student> {
        client.get(client.endpoints().student(id)).await
    }

    pub async fn create(client: &ApiClient, form: &StudentForm) -> ApiResult<Student> {
        client
            .post(client.endpoints().students(), &form.normalized())
            .await
    }

    pub async fn update(client: &ApiClient, id: i64, form: &StudentForm) -> ApiResult<Student> {
        client
            .put(client.endpoints().student(id), &form.normalized())
            .await
    }

    pub async fn delete(client: &ApiClient, id: i64) -> ApiResult<()> {
        client.delete(client.endpoints().student(id)).await
    }

    pub async fn payments(client: &ApiClient, id: i64) -> ApiResult<Vec<Payment>> {
        client.get(client.endpoints().student_payments(id)).await
    }

    pub async fn payment_summary(client: &ApiClient, id: i64) -> ApiResult<PaymentSummary> {
        client
            .get(client.endpoints().student_payment_summary(id))
            .await
    }
}
