use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::payments::dto::{CreatedPayment, Payment, PaymentForm, PaymentsOverview};

impl Payment {
    pub async fn list(client: &ApiClient) -> ApiResult<Vec<Payment>> {
        client.get(client.endpoints().payments()).await
    }

    pub async fn get(client: &ApiClient, id: i64) -> ApiResult<Payment> {
        client.get(client.endpoints().payment(id)).await
    }

    pub async fn create(client: &ApiClient, form: &PaymentForm) -> ApiResult<CreatedPayment> {
        client.post(client.endpoints().payments(), form).await
    }

    pub async fn update(client: &ApiClient, id: i64, form: &PaymentForm) -> ApiResult<Payment> {
        client.put(client.endpoints().payment(id), form).await
    }

    pub async fn delete(client: &ApiClient, id: i64) -> ApiResult<()> {
        client.delete(client.endpoints().payment(id)).await
    }

    pub async fn overview(client: &ApiClient) -> ApiResult<PaymentsOverview> {
        client.get(client.endpoints().payments_overview()).await
    }
}
