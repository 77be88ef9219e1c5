use models::errors::ModelError;
use service::ServiceError;
use thiserror::Error;
use tonic::Status;
use tracing::error;

/// Map a service failure onto a gRPC status.
///
/// Storage failures are logged here and reach the client as `INTERNAL`.
pub fn into_status(err: ServiceError) -> Status {
    match err {
        ServiceError::NotFound(msg) | ServiceError::MissingParent(msg) => Status::not_found(msg),
        ServiceError::Model(ModelError::Validation(msg)) => Status::invalid_argument(msg),
        ServiceError::Constraint(msg) | ServiceError::Db(msg) | ServiceError::Model(ModelError::Db(msg)) => {
            error!(error = %msg, "storage failure");
            Status::internal(msg)
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn codes_follow_error_kind() {
        assert_eq!(into_status(ServiceError::not_found("Team")).code(), Code::NotFound);
        assert_eq!(into_status(ServiceError::MissingParent("fk".into())).code(), Code::NotFound);
        assert_eq!(
            into_status(ServiceError::Model(ModelError::Validation("blank".into()))).code(),
            Code::InvalidArgument
        );
        assert_eq!(into_status(ServiceError::Db("gone".into())).code(), Code::Internal);
        assert_eq!(into_status(ServiceError::Constraint("dup".into())).code(), Code::Internal);
    }

    #[test]
    fn not_found_message_is_bare() {
        assert_eq!(into_status(ServiceError::not_found("Product")).message(), "Product not found");
    }
}
