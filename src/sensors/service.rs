use crate::{
    api::{
        dto::{SensorDto, SensorWriteDto},
        ApiError,
    },
    models::{Sensor, SensorDraft},
    resource::{Resource, ResourceService},
    validation::{self, FieldErrors},
};

/// `/Sensor`
pub struct SensorResource;

impl Resource for SensorResource {
    const PATH: &'static str = "Sensor";
    const NAME: &'static str = "sensor";

    type Wire = SensorDto;
    type Item = Sensor;
    type Draft = SensorDraft;
    type Payload = SensorWriteDto;

    fn prepare(draft: &SensorDraft) -> Result<SensorWriteDto, FieldErrors> {
        validation::check_sensor(draft).map(SensorWriteDto::from)
    }

    fn into_item(wire: SensorDto) -> Result<Sensor, ApiError> {
        Ok(Sensor::from(wire))
    }
}

pub type SensorService<T> = ResourceService<SensorResource, T>;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::{api::mock::MockTransport, validation::Field};

    fn service() -> (Arc<MockTransport>, SensorService<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        (transport.clone(), SensorService::new(transport))
    }

    #[tokio::test]
    async fn list_maps_every_sensor() {
        let (transport, sensors) = service();
        transport.respond(
            Method::GET,
            "Sensor",
            json!([
                { "id": 1, "nome": "Freezer", "localizacao": "Cozinha" },
                { "id": 2, "nome": "Câmara", "localizacao": "Depósito" }
            ]),
        );

        let all = sensors.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].nome, "Câmara");
        assert_eq!(transport.calls()[0].path, "Sensor");
    }

    #[tokio::test]
    async fn get_by_id_uses_item_path() {
        let (transport, sensors) = service();
        transport.respond(
            Method::GET,
            "Sensor/7",
            json!({ "id": 7, "nome": "Estufa", "localizacao": "Laboratório" }),
        );

        let sensor = sensors.get_by_id(7).await.unwrap();
        assert_eq!(
            sensor,
            Sensor {
                id: 7,
                nome: "Estufa".to_owned(),
                localizacao: "Laboratório".to_owned(),
            }
        );
    }

    #[tokio::test]
    async fn create_sends_trimmed_fields() {
        let (transport, sensors) = service();
        transport.respond(
            Method::POST,
            "Sensor",
            json!({ "id": 3, "nome": "Freezer", "localizacao": "Cozinha" }),
        );

        let created = sensors
            .create(&SensorDraft::new("  Freezer ", "Cozinha  "))
            .await
            .unwrap();
        assert_eq!(created.id, 3);

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::POST);
        assert_eq!(
            calls[0].options.body,
            Some(json!({ "nome": "Freezer", "localizacao": "Cozinha" }))
        );
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_transport() {
        let (transport, sensors) = service();

        let err = sensors.create(&SensorDraft::new("ab", "")).await.unwrap_err();
        let errors = err.field_errors().expect("validation error");
        assert!(errors.get(Field::Nome).is_some());
        assert!(errors.get(Field::Localizacao).is_some());

        let err = sensors.update(1, &SensorDraft::new("ab", "Sala")).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationFailed(_)));

        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn update_puts_to_item_path_and_ignores_body() {
        let (transport, sensors) = service();
        transport.respond(Method::PUT, "Sensor/4", json!(""));

        sensors
            .update(4, &SensorDraft::new("Freezer 2", "Cozinha"))
            .await
            .unwrap();

        let call = &transport.calls()[0];
        assert_eq!(call.method, Method::PUT);
        assert_eq!(call.path, "Sensor/4");
    }

    #[tokio::test]
    async fn delete_propagates_server_errors() {
        let (transport, sensors) = service();
        transport.respond(Method::DELETE, "Sensor/1", json!(""));
        transport.fail(
            Method::DELETE,
            "Sensor/2",
            ApiError::Http {
                status: 409,
                message: "Sensor possui leituras".to_owned(),
            },
        );

        sensors.delete(1).await.unwrap();
        let err = sensors.delete(2).await.unwrap_err();
        assert_eq!(err.to_string(), "Sensor possui leituras");
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn unexpected_shape_is_malformed() {
        let (transport, sensors) = service();
        transport.respond(Method::GET, "Sensor", json!({ "items": [] }));

        let err = sensors.list().await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse { .. }));
    }
}
