//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Orama answer client configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[endpoint]
url = "https://api.orama.com"
# collection_id = "your-collection-id"

[auth]
# Prefer the environment variable over an inline key.
# read_api_key = ""
read_api_key_env = "ORAMA_READ_API_KEY"

[llm]
# provider = "openai"
# model = "gpt-4o-mini"

[transport]
# connect_timeout_secs = 10     # 1-60
# request_timeout_secs = 120    # 1-600

[session]
# max_prior_messages = 50       # 0-200
# system_prompt = "You are a helpful documentation assistant."

[logging]
# level = "INFO"                # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
