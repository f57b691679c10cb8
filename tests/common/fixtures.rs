pub const PAGE_URL: &str = "https://shop.example.com/catalog/page-1";

/// A product listing with embedded JSON state and an inline script.
pub const CATALOG: &str = r#"<html>
<head>
  <title>Catalog</title>
  <script id="state" type="application/json">{"total": 3, "tags": ["new", "sale"]}</script>
  <script>var config = {"currency": "EUR", "rate": 1.5}; var pageSize = 20;</script>
</head>
<body>
  <h1 class="title main">Spring Catalog</h1>
  <ul id="products">
    <li class="item"><a href="/p/1">Apple Pie</a><span class="price">4.50</span></li>
    <li class="item sale"><a href="/p/2">Banana Bread</a><span class="price">3.00</span></li>
    <li class="item"><a href="/p/3">Apple Cider</a><span class="price">2.75</span></li>
  </ul>
  <div class="pager"><a class="next" href="?page=2">Next</a></div>
</body>
</html>"#;

pub const ORDERS: &str = r#"{
  "page": 1,
  "customer": {"name": "Ada", "tier": "gold"},
  "items": ["apple pie", "banana", "apple cider"],
  "orders": [
    {"id": "A-1", "total": 12, "lines": [{"sku": "x1"}, {"sku": "x2"}]},
    {"id": "B-2", "total": 30, "lines": [{"sku": "y1"}]}
  ]
}"#;
