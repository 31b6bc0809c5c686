use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Encryption,
    Integrity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl TestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TestStatus::Success | TestStatus::Failed)
    }

    /// Clase Bootstrap del badge
    pub fn css_class(&self) -> &'static str {
        match self {
            TestStatus::Success => "success",
            TestStatus::Failed => "danger",
            TestStatus::Running => "warning",
            TestStatus::Pending => "secondary",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TestStatus::Success => "✅",
            TestStatus::Failed => "❌",
            TestStatus::Running => "⏳",
            TestStatus::Pending => "▶️",
        }
    }
}

/// Resultado de cifrado en reposo
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncryptionReport {
    pub original_data: String,
    pub encrypted_data: String,
    pub decrypted_data: String,
    pub is_valid: bool,
}

/// Resultado de un sub-test de integridad
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubTestOutcome {
    pub name: String,
    pub passed: bool,
    pub reason: String,
    /// Status HTTP observado (None si la red falló antes de obtener respuesta)
    pub http_status: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub entrega_id: i64,
    pub original_payload: serde_json::Value,
    pub original_signature: String,
    pub altered_payload: serde_json::Value,
    pub altered_signature: String,
    pub valid_signature_test: SubTestOutcome,
    pub altered_payload_test: SubTestOutcome,
    pub altered_signature_test: SubTestOutcome,
    pub is_valid: bool,
}

impl IntegrityReport {
    pub fn sub_tests(&self) -> [&SubTestOutcome; 3] {
        [
            &self.valid_signature_test,
            &self.altered_payload_test,
            &self.altered_signature_test,
        ]
    }

    /// Sub-tests que no obtuvieron el resultado esperado, con su motivo
    pub fn failed_cases(&self) -> Vec<&SubTestOutcome> {
        self.sub_tests().into_iter().filter(|t| !t.passed).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestResult {
    Encryption(EncryptionReport),
    Integrity(IntegrityReport),
    Error { message: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SecurityTest {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub test_type: TestType,
    pub status: TestStatus,
    pub result: Option<TestResult>,
    pub timestamp: Option<String>,
}

impl SecurityTest {
    pub fn new(id: &str, name: &str, description: &str, test_type: TestType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            test_type,
            status: TestStatus::Pending,
            result: None,
            timestamp: None,
        }
    }

    /// Tests disponibles en la vista de seguridad
    pub fn defaults() -> Vec<SecurityTest> {
        vec![
            SecurityTest::new(
                "encryption_test",
                "Validación de Cifrado",
                "Verificar que los datos sensibles se almacenan cifrados en la BD",
                TestType::Encryption,
            ),
            SecurityTest::new(
                "integrity_test",
                "Validación de Integridad",
                "Verificar que los mensajes con firmas inválidas son rechazados",
                TestType::Integrity,
            ),
        ]
    }

    /// pending -> running
    pub fn start(&mut self) -> Result<(), String> {
        if self.status != TestStatus::Pending {
            return Err(format!(
                "El test {} no está pendiente ({:?})",
                self.id, self.status
            ));
        }
        self.status = TestStatus::Running;
        self.result = None;
        self.timestamp = None;
        Ok(())
    }

    /// running -> success | failed
    pub fn finish(&mut self, passed: bool, result: TestResult, timestamp: String) -> Result<(), String> {
        if self.status != TestStatus::Running {
            return Err(format!(
                "El test {} no está en ejecución ({:?})",
                self.id, self.status
            ));
        }
        self.status = if passed {
            TestStatus::Success
        } else {
            TestStatus::Failed
        };
        self.result = Some(result);
        self.timestamp = Some(timestamp);
        Ok(())
    }

    /// Vuelve a pending desde un estado terminal
    pub fn reset(&mut self) {
        if self.status.is_terminal() {
            self.status = TestStatus::Pending;
            self.result = None;
            self.timestamp = None;
        }
    }
}
