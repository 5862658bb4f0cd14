mod credential_providers;
