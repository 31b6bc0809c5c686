// ============================================================================
// TOKEN CODEC - Decodificación de claims del bearer token (solo lectura)
// ============================================================================
// El token es compacto: header.payload.firma. Solo se consume el segmento
// central (base64url -> UTF-8 -> JSON). Nunca se valida la firma aquí.
// ============================================================================

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

use crate::models::SubjectId;

/// Nombres de claim donde distintos emisores guardan los roles, en orden de prioridad
const ROLE_CLAIMS: &[&str] = &["roles", "role", "rol", "authorities"];

#[derive(Clone, Debug, PartialEq)]
pub struct Subject {
    pub id: Option<SubjectId>,
    pub nombre: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TokenClaims {
    pub subject: Option<Subject>,
    pub roles: Vec<String>,
    pub exp: Option<i64>,
}

impl TokenClaims {
    pub fn subject_id(&self) -> Option<&SubjectId> {
        self.subject.as_ref()?.id.as_ref()
    }

    pub fn subject_name(&self) -> Option<&str> {
        self.subject.as_ref()?.nombre.as_deref()
    }

    /// Parseo en la frontera: toda la búsqueda de nombres de claim ocurre aquí
    fn from_json(json: &Value) -> Option<Self> {
        let obj = json.as_object()?;

        let sub = obj.get("sub");
        let subject = match sub {
            Some(Value::Object(sub_obj)) => Some(Subject {
                id: sub_obj.get("id").and_then(subject_id_from),
                nombre: sub_obj
                    .get("nombre")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
            }),
            // `sub` plano: es el identificador
            Some(other) => Some(Subject {
                id: subject_id_from(other),
                nombre: obj.get("nombre").and_then(|v| v.as_str()).map(|s| s.to_string()),
            }),
            None => None,
        };

        let nested_roles = match sub {
            Some(Value::Object(sub_obj)) => sub_obj.get("roles").and_then(roles_from),
            _ => None,
        };
        let roles = nested_roles
            .or_else(|| {
                ROLE_CLAIMS
                    .iter()
                    .find_map(|claim| obj.get(*claim).and_then(roles_from))
            })
            .unwrap_or_default();

        Some(Self {
            subject,
            roles,
            exp: obj.get("exp").and_then(|v| v.as_i64()),
        })
    }
}

fn subject_id_from(value: &Value) -> Option<SubjectId> {
    match value {
        Value::Number(n) => n.as_i64().map(SubjectId::Numero),
        Value::String(s) if !s.is_empty() => Some(SubjectId::Texto(s.clone())),
        _ => None,
    }
}

/// Acepta "a,b" o ["a", "b"]
fn roles_from(value: &Value) -> Option<Vec<String>> {
    let roles: Vec<String> = match value {
        Value::String(s) => s
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect(),
        _ => return None,
    };
    Some(roles)
}

/// Decodifica base64url con o sin padding; tolera también el alfabeto estándar
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    URL_SAFE_NO_PAD.decode(normalized.as_bytes()).ok()
}

/// Claims del token, o None si el token está mal formado (nunca falla con panic)
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut segments = token.trim().split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    if payload.is_empty() {
        return None;
    }

    let bytes = decode_segment(payload)?;
    let text = String::from_utf8(bytes).ok()?;
    let json: Value = serde_json::from_str(&text).ok()?;
    TokenClaims::from_json(&json)
}

/// `sub.id` del token
pub fn user_id_from_token(token: &str) -> Option<SubjectId> {
    decode_claims(token)?.subject_id().cloned()
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    /// Token con firma falsa, suficiente para el decoder
    pub fn token_with_claims(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{}.{}.firma", header, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::test_tokens::token_with_claims;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_nested_subject() {
        let token = token_with_claims(&json!({
            "sub": {"id": 7, "nombre": "jonatan", "roles": "Admin,System"},
            "exp": 1700000000
        }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.subject_id(), Some(&SubjectId::Numero(7)));
        assert_eq!(claims.subject_name(), Some("jonatan"));
        assert_eq!(claims.roles, vec!["Admin".to_string(), "System".to_string()]);
        assert_eq!(claims.exp, Some(1700000000));
    }

    #[test]
    fn test_roles_from_top_level_list() {
        let token = token_with_claims(&json!({"sub": "u-1", "authorities": ["user", " ops "]}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.subject_id(), Some(&SubjectId::Texto("u-1".to_string())));
        assert_eq!(claims.roles, vec!["user".to_string(), "ops".to_string()]);
    }

    #[test]
    fn test_non_ascii_payload() {
        let token = token_with_claims(&json!({"sub": {"id": 1, "nombre": "Iñés Pérez"}}));
        assert_eq!(decode_claims(&token).unwrap().subject_name(), Some("Iñés Pérez"));
    }

    #[test]
    fn test_padded_and_standard_alphabet_segments() {
        use base64::engine::general_purpose::STANDARD;
        // "?>" fuerza caracteres '+' / '/' en el alfabeto estándar
        let claims = json!({"sub": {"id": 3, "nombre": "??>>"}});
        let payload = STANDARD.encode(claims.to_string().as_bytes());
        let token = format!("e30.{}.x", payload);
        assert_eq!(user_id_from_token(&token), Some(SubjectId::Numero(3)));
    }

    #[test]
    fn test_malformed_tokens_yield_none() {
        assert!(decode_claims("").is_none());
        assert!(decode_claims("solo-un-segmento").is_none());
        assert!(decode_claims("a.").is_none());
        assert!(decode_claims("a.%%%%.c").is_none());
        // base64 válido pero no JSON
        let not_json = URL_SAFE_NO_PAD.encode(b"no soy json");
        assert!(decode_claims(&format!("a.{}.c", not_json)).is_none());
        // JSON válido pero no objeto
        let array = URL_SAFE_NO_PAD.encode(b"[1,2]");
        assert!(decode_claims(&format!("a.{}.c", array)).is_none());
        // bytes no UTF-8
        let invalid_utf8 = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]);
        assert!(decode_claims(&format!("a.{}.c", invalid_utf8)).is_none());
    }

    #[test]
    fn test_missing_subject_id() {
        let token = token_with_claims(&json!({"sub": {"nombre": "anon"}}));
        assert!(decode_claims(&token).is_some());
        assert!(user_id_from_token(&token).is_none());
    }
}
