//! Tests for mail transport selection

use mp_shared::config::{AppConfig, Environment, MailProvider, SecretRef, SmtpSecurity};

use crate::mail::create_mail_transport;

#[tokio::test]
async fn test_create_mock_transport() {
    let config = AppConfig::for_environment(Environment::Development);
    let transport = create_mail_transport(&config).unwrap();
    assert_eq!(transport.provider_name(), "mock");
}

#[tokio::test]
async fn test_create_smtp_transport() {
    let mut config = AppConfig::for_environment(Environment::Staging);
    config.mail.provider = MailProvider::Smtp;
    config.mail.smtp.host = "localhost".to_string();
    config.mail.smtp.security = SmtpSecurity::Plain;

    let transport = create_mail_transport(&config).unwrap();
    assert_eq!(transport.provider_name(), "smtp");
}

#[tokio::test]
async fn test_smtp_without_password_fails() {
    let mut config = AppConfig::for_environment(Environment::Production);
    config.mail.provider = MailProvider::Smtp;
    config.mail.smtp.username = "sender@gmail.com".to_string();
    config.mail.smtp.password = SecretRef::from_env_var("MAPLANTE_TEST_UNSET_SMTP_PASSWORD");

    assert!(create_mail_transport(&config).is_err());
}
