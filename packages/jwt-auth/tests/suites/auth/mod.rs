mod end_to_end;
mod extractor;
mod login;
mod middleware;
