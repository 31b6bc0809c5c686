pub mod auth;
pub mod entrega;
pub mod monitor;
pub mod security;

pub use auth::{
    LoginRequest, LoginResponse, SignRequest, SignatureResponse, SignupRequest, SignupResponse,
    SubjectId, User, ValidateRequest, ValidationResponse,
};
pub use entrega::{Entrega, NuevaEntrega, TareaRequest, TareaResponse};
pub use monitor::{response_time_class, LogisticaStatus, PingResult};
pub use security::{
    EncryptionReport, IntegrityReport, SecurityTest, SubTestOutcome, TestResult, TestStatus, TestType,
};
