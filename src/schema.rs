diesel::table! {
    users (id) {
        id -> Int8,
        name -> Text,
        email -> Text,
        password_hash -> Text,
        photo -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    hotels (id) {
        id -> Int8,
        user_id -> Int8,
        name -> Text,
        address -> Text,
        email -> Nullable<Text>,
        phone -> Nullable<Text>,
        price_cents -> Int8,
        currency -> Text,
        photo -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    personal_access_tokens (id) {
        id -> Int8,
        user_id -> Int8,
        name -> Text,
        token_hash -> Text,
        last_used_at -> Nullable<Timestamptz>,
        expires_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    password_reset_tokens (email) {
        email -> Text,
        token_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(hotels -> users (user_id));
diesel::joinable!(personal_access_tokens -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    hotels,
    personal_access_tokens,
    password_reset_tokens,
);
