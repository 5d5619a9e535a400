mod admin_blog;
mod autosave;
mod blog;
mod contact;
mod export;
mod health_check;
mod site_pages;
mod test_app;
mod test_data;
mod users;
