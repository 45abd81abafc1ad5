//! Wire messages for `auth.Auth/RegisterClient`.

/// Full gRPC method path.
pub const REGISTER_CLIENT_PATH: &str = "/auth.Auth/RegisterClient";

#[derive(Clone, PartialEq, prost::Message)]
pub struct RegisterClientRequest {
    #[prost(string, tag = "1")]
    pub app_name: String,
    #[prost(string, tag = "2")]
    pub secret: String,
    #[prost(string, tag = "3")]
    pub redirect_url: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RegisterClientResponse {
    #[prost(int64, tag = "1")]
    pub app_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_request_field_tags() {
        let request = RegisterClientRequest {
            app_name: "a".into(),
            secret: String::new(),
            redirect_url: "r".into(),
        };
        // tag 1 (len-delimited) = 0x0a, tag 3 = 0x1a; empty field 2 is omitted.
        assert_eq!(request.encode_to_vec(), vec![0x0a, 1, b'a', 0x1a, 1, b'r']);
    }

    #[test]
    fn test_response_decodes_app_id() {
        let response = RegisterClientResponse::decode(&[0x08, 42][..]).unwrap();
        assert_eq!(response.app_id, 42);
    }
}
