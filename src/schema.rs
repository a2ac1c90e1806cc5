diesel::table! {
    manufacturers (id) {
        id -> Integer,
        name -> Text,
        logo_path -> Nullable<Text>,
        created_at -> BigInt,
        updated_at -> BigInt,
    }
}

diesel::table! {
    equipments (id) {
        id -> Integer,
        name -> Text,
        model -> Text,
        manufacturer_id -> Nullable<Integer>,
        image_path -> Nullable<Text>,
        created_at -> BigInt,
        updated_at -> BigInt,
    }
}

diesel::table! {
    files (id) {
        id -> Integer,
        name -> Text,
        kind -> Text,
        equipment_id -> Nullable<Integer>,
        file_path -> Text,
        file_size -> BigInt,
        download_count -> BigInt,
        uploaded_by -> Nullable<Integer>,
        created_at -> BigInt,
        updated_at -> BigInt,
    }
}
