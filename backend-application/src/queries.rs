pub mod upload_queries;
