// SPDX-License-Identifier: BUSL-1.1

use super::*;

#[tokio::test]
async fn test_double_returns_responses_in_order() {
    let client = TestDoubleClient::new(vec![
        Ok(ConfigResponse::NotModified),
        Ok(ConfigResponse::Modified(b"v2".to_vec())),
    ]);

    assert_eq!(client.fetch_config("h0").await.unwrap(), ConfigResponse::NotModified);
    assert_eq!(client.fetch_config("h0").await.unwrap(), ConfigResponse::Modified(b"v2".to_vec()));
}

#[tokio::test]
async fn test_double_exhausted_returns_temporary_error() {
    let client = TestDoubleClient::new(vec![]);
    let err = client.fetch_config("h0").await.unwrap_err();
    assert!(matches!(err, FetchError::Temporary(_)));
}
