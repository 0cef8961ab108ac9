use super::pagination::*;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 20);
}

#[test]
fn test_page_request_offset() {
    assert_eq!(PageRequest::new(1, 20).offset(), 0);
    assert_eq!(PageRequest::new(2, 20).offset(), 20);
    assert_eq!(PageRequest::new(3, 15).offset(), 30);
}

#[test]
fn test_page_request_clamps() {
    let request = PageRequest::new(0, 0);
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 1);

    let request = PageRequest::new(2, 10_000);
    assert_eq!(request.limit(), u64::from(MAX_PER_PAGE));
}

#[test]
fn test_page_index_is_zero_based() {
    assert_eq!(PageRequest::new(1, 10).page_index(), 0);
    assert_eq!(PageRequest::new(4, 10).page_index(), 3);
}

#[test]
fn test_page_response_new() {
    let data = vec![1, 2, 3];
    let response = PageResponse::new(data.clone(), &PageRequest::new(1, 10), 3);

    assert_eq!(response.data, data);
    assert_eq!(response.meta.page, 1);
    assert_eq!(response.meta.per_page, 10);
    assert_eq!(response.meta.total, 3);
    assert_eq!(response.meta.total_pages, 1);
}

#[test]
fn test_page_response_pagination() {
    // 25 items, 10 per page -> 3 pages
    let response: PageResponse<i32> = PageResponse::new(vec![], &PageRequest::new(1, 10), 25);
    assert_eq!(response.meta.total_pages, 3);

    let response: PageResponse<i32> = PageResponse::new(vec![], &PageRequest::new(1, 10), 30);
    assert_eq!(response.meta.total_pages, 3);
}

#[test]
fn test_page_response_empty() {
    let response: PageResponse<i32> = PageResponse::new(vec![], &PageRequest::default(), 0);
    assert_eq!(response.meta.total_pages, 1);
    assert!(response.data.is_empty());
}
